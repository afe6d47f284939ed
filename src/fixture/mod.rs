//! Fixture loading.
//!
//! Defines the `FixtureSource` trait and implementations for reading the
//! demo fixture from a local file or over HTTP. The fixture is fetched once
//! at startup; failures are reported as `DemoError::Fetch` or
//! `DemoError::MalformedFixture`.

pub mod builder;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::FixtureConfig;
use crate::engine::DemoContext;
use crate::types::{DemoData, DemoError};

/// Abstraction over where the fixture comes from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Fetch and parse the fixture.
    async fn fetch(&self) -> Result<DemoData, DemoError>;

    /// Human-readable location for logs and error messages.
    fn describe(&self) -> String;
}

/// Parse fixture JSON, attributing failures to `source_desc`.
pub fn parse_fixture(json: &str, source_desc: &str) -> Result<DemoData, DemoError> {
    serde_json::from_str(json).map_err(|e| DemoError::MalformedFixture {
        source_desc: source_desc.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FixtureSource for FileSource {
    async fn fetch(&self) -> Result<DemoData, DemoError> {
        let desc = self.describe();
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DemoError::Fetch {
                source_desc: desc.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %desc, bytes = json.len(), "Fixture read");
        parse_fixture(&json, &desc)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("aerial-demo/0.1.0")
            .build()
            .context("Failed to build fixture HTTP client")?;
        Ok(Self { http, url: url.into() })
    }
}

#[async_trait]
impl FixtureSource for HttpSource {
    async fn fetch(&self) -> Result<DemoData, DemoError> {
        let fetch_err = |e: reqwest::Error| DemoError::Fetch {
            source_desc: self.url.clone(),
            message: e.to_string(),
        };

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;
        let json = resp.text().await.map_err(fetch_err)?;
        debug!(url = %self.url, bytes = json.len(), "Fixture downloaded");
        parse_fixture(&json, &self.url)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Pick a source for the configured location: http(s) URLs go over the
/// network, anything else is a file path.
pub fn source_for(config: &FixtureConfig) -> anyhow::Result<Box<dyn FixtureSource>> {
    let source = config.source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpSource::new(
            source,
            Duration::from_secs(config.timeout_secs),
        )?))
    } else {
        Ok(Box::new(FileSource::new(source)))
    }
}

/// Fetch the fixture and wrap it in a `DemoContext`.
pub async fn load_context(source: &dyn FixtureSource) -> Result<DemoContext, DemoError> {
    let desc = source.describe();
    let data = source.fetch().await?;
    info!(
        source = %desc,
        overview_items = data.overview.len(),
        profiles = data.perf_profiles.len(),
        "Fixture loaded"
    );
    Ok(DemoContext::new(data, desc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
