//! Aerial demo entry point.
//!
//! Loads configuration, initialises structured logging, fetches the demo
//! fixture, and either serves the showcase page or runs one of the
//! offline subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use aerial_demo::config::AppConfig;
use aerial_demo::dashboard::{self, routes::DashboardState};
use aerial_demo::engine::{DemoView, FormInput};
use aerial_demo::fixture::{self, builder};
use aerial_demo::render;

const BANNER: &str = r#"
    _               _       _
   /_\   ___  _ _  (_) __ _| |
  / _ \ / -_)| '_| | |/ _` | |
 /_/ \_\\___||_|   |_|\__,_|_|

  RAN session simulator showcase
"#;

/// Synthetic 5G session simulator and demo page
#[derive(Parser)]
#[command(name = "aerial-demo")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", env = "AERIAL_DEMO_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo page (default)
    Serve {
        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one simulation and print the result
    Simulate {
        /// Profile name (defaults to the configured or first profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// Traffic type: voice, video or iot
        #[arg(short, long)]
        traffic_type: Option<String>,

        /// Concurrency level
        #[arg(short, long)]
        concurrency: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render the initial page to a static HTML file
    Render {
        #[arg(short, long, default_value = "demo.html")]
        output: PathBuf,
    },

    /// Rebuild the fixture from an SDK checkout
    BuildData {
        /// Root of the SDK source tree
        #[arg(short, long)]
        repo_root: PathBuf,

        #[arg(short, long, default_value = "data/demo-data.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load_or_default(&cli.config)?;

    init_logging();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => run_server(cfg, port).await,
        Commands::Simulate { profile, traffic_type, concurrency, json } => {
            run_simulate(&cfg, profile, traffic_type, concurrency, json).await
        }
        Commands::Render { output } => run_render(&cfg, &output).await,
        Commands::BuildData { repo_root, output } => {
            let data = builder::build_demo_data(&repo_root)?;
            builder::write_fixture(&data, &output)?;
            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

async fn run_server(mut cfg: AppConfig, port: Option<u16>) -> Result<()> {
    if let Some(p) = port {
        cfg.server.port = p;
    }

    println!("{BANNER}");
    info!(
        fixture = %cfg.fixture.source,
        addr = %cfg.bind_addr(),
        "Aerial demo starting up"
    );

    let source = fixture::source_for(&cfg.fixture)?;
    let loaded = fixture::load_context(source.as_ref()).await;
    let state = Arc::new(DashboardState::from_load(loaded, &cfg.defaults, cfg.slider));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received.");
    };

    dashboard::serve(state, &cfg.bind_addr(), shutdown).await?;
    info!("Aerial demo shut down cleanly.");
    Ok(())
}

async fn run_simulate(
    cfg: &AppConfig,
    profile: Option<String>,
    traffic_type: Option<String>,
    concurrency: Option<f64>,
    json: bool,
) -> Result<()> {
    let source = fixture::source_for(&cfg.fixture)?;
    let ctx = fixture::load_context(source.as_ref()).await?;

    let profile = match profile.or_else(|| cfg.defaults.profile.clone()) {
        Some(p) => p,
        None => ctx
            .data
            .perf_profiles
            .first()
            .map(|p| p.name.clone())
            .context("Fixture has no perf profiles")?,
    };
    let input = FormInput {
        profile,
        traffic_type: traffic_type.unwrap_or_else(|| cfg.defaults.traffic_type.clone()),
        concurrency: concurrency.unwrap_or(cfg.defaults.concurrency).to_string(),
    };

    let (selection, result) = ctx.run_simulation(&input, &cfg.slider)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} | {} | concurrency {}\n",
            selection.profile, selection.traffic_type, selection.concurrency
        );
        print!("{}", render::render_text(&result));
    }
    Ok(())
}

async fn run_render(cfg: &AppConfig, output: &Path) -> Result<()> {
    let source = fixture::source_for(&cfg.fixture)?;
    let ctx = fixture::load_context(source.as_ref()).await?;

    let mut view = DemoView::new(&cfg.defaults, cfg.slider);
    view.initialize(&ctx)?;

    let html = render::render_document(&view, Some(&ctx)).to_html()?;
    std::fs::write(output, html)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), "Page rendered");
    println!("Wrote {}", output.display());
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aerial_demo=info"));

    let json_logging = std::env::var("AERIAL_DEMO_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
