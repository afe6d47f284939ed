//! Page rendering.
//!
//! Each `render_*` / `populate_*` function returns the complete replacement
//! markup for one page container, so calling it again simply yields the
//! same fragment. `render_document` gathers every fragment for the current
//! view into a `RenderedDocument`, which fills the embedded page template.

use std::fmt::Write as _;

use handlebars::{html_escape, Handlebars};
use serde::Serialize;

use crate::engine::{DemoContext, DemoView};
use crate::types::{DemoError, Metrics, PerfProfile, Session, SimulationResult, TrafficType};

/// The embedded page template (compiled into the binary).
const PAGE_TEMPLATE: &str = include_str!("templates/index.html");

const DEFAULT_TITLE: &str = "Aerial RAN Showcase";

/// Slider values print without a trailing `.0` when whole.
fn format_number(value: f64) -> String {
    format!("{value}")
}

// ---------------------------------------------------------------------------
// Container fragments
// ---------------------------------------------------------------------------

/// KPI label/value pairs in display order.
pub fn kpi_values(metrics: &Metrics) -> [(&'static str, String); 4] {
    [
        ("Estimated Throughput", format!("{:.2} Gbps", metrics.throughput_gbps)),
        ("Avg Latency", format!("{:.2} ms", metrics.avg_latency_ms)),
        ("Target Reliability", format!("{:.3}%", metrics.reliability * 100.0)),
        ("GPU Load Index", format!("{:.1} / 100", metrics.gpu_load)),
    ]
}

/// Markup for `#kpi-grid`.
pub fn render_kpis(metrics: &Metrics) -> String {
    let mut html = String::new();
    for (label, value) in kpi_values(metrics) {
        let _ = write!(
            html,
            r#"<article class="card"><h3>{label}</h3><div class="count">{value}</div></article>"#
        );
    }
    html
}

/// Markup for `#sessions-body`.
pub fn render_sessions(sessions: &[Session]) -> String {
    let mut html = String::new();
    for s in sessions {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.3}%</td></tr>",
            html_escape(&s.session_id),
            html_escape(&s.slice),
            s.prbs,
            s.latency_ms,
            s.reliability * 100.0,
        );
    }
    html
}

/// Markup for `#overview-list`.
pub fn populate_overview(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", html_escape(item)))
        .collect()
}

/// Markup for `#profile-select`.
pub fn populate_profile_options(profiles: &[PerfProfile], selected: &str) -> String {
    profiles
        .iter()
        .map(|p| {
            let sel = if p.name == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                html_escape(&p.name),
                html_escape(&p.to_string()),
            )
        })
        .collect()
}

/// Markup for `#traffic-type`.
pub fn populate_traffic_options(selected: Option<TrafficType>) -> String {
    TrafficType::ALL
        .iter()
        .map(|t| {
            let sel = if Some(*t) == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{sel}>{}</option>"#, t.key(), t.label())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Every page container's markup plus the form control values.
///
/// `title`, `banner` and `footer` are plain text and are escaped by the
/// template; the other container fields hold pre-built markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub title: String,
    pub overview_list: String,
    pub profile_options: String,
    pub traffic_options: String,
    pub concurrency_value: String,
    pub concurrency_input: String,
    pub slider_min: String,
    pub slider_max: String,
    pub slider_step: String,
    pub kpi_grid: String,
    pub sessions_body: String,
    pub banner: String,
    pub footer: String,
}

impl RenderedDocument {
    /// Fill the page template.
    pub fn to_html(&self) -> Result<String, DemoError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars
            .render_template(PAGE_TEMPLATE, self)
            .map_err(|e| DemoError::Render(e.to_string()))
    }
}

/// Project the view (and the fixture, once loaded) onto every container.
pub fn render_document(view: &DemoView, ctx: Option<&DemoContext>) -> RenderedDocument {
    let title = ctx
        .and_then(|c| c.data.repo.clone())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let (overview_list, profile_options) = match ctx {
        Some(c) => (
            populate_overview(&c.data.overview),
            populate_profile_options(&c.data.perf_profiles, &view.form.profile),
        ),
        None => (String::new(), String::new()),
    };

    let (kpi_grid, sessions_body) = match &view.rendered {
        Some(SimulationResult { sessions, metrics }) => {
            (render_kpis(metrics), render_sessions(sessions))
        }
        None => (String::new(), String::new()),
    };

    let banner = match (&view.last_error, ctx) {
        (Some(e), _) => e.to_string(),
        (None, None) => "Demo data not loaded.".to_string(),
        (None, Some(_)) => String::new(),
    };

    let footer = match ctx {
        Some(c) => format!(
            "Fixture: {} · loaded {} · runs: {}",
            c.source,
            c.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            view.runs,
        ),
        None => String::new(),
    };

    RenderedDocument {
        title,
        overview_list,
        profile_options,
        traffic_options: populate_traffic_options(view.traffic_type()),
        concurrency_value: format_number(view.concurrency_label),
        concurrency_input: format_number(view.concurrency_label),
        slider_min: format_number(view.slider.min),
        slider_max: format_number(view.slider.max),
        slider_step: format_number(view.slider.step),
        kpi_grid,
        sessions_body,
        banner,
        footer,
    }
}

/// Plain-text table for terminal output.
pub fn render_text(result: &SimulationResult) -> String {
    let mut out = String::new();
    for (label, value) in kpi_values(&result.metrics) {
        let _ = writeln!(out, "{label:<22}{value}");
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<20} {:<6} {:>5} {:>12} {:>12}",
        "SESSION", "SLICE", "PRBS", "LATENCY(ms)", "RELIABILITY"
    );
    for s in &result.sessions {
        let _ = writeln!(
            out,
            "{:<20} {:<6} {:>5} {:>12.2} {:>11.3}%",
            s.session_id,
            s.slice,
            s.prbs,
            s.latency_ms,
            s.reliability * 100.0,
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
