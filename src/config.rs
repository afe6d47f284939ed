//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section has defaults, so a partial file (or no file at all) still yields
//! a runnable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fixture: FixtureConfig,
    pub defaults: DefaultsConfig,
    pub slider: SliderConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FixtureConfig {
    /// Local path or http(s) URL of the demo fixture.
    pub source: String,
    /// Request timeout for http sources.
    pub timeout_secs: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            source: "data/demo-data.json".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Form values used for the initial simulation.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Initial profile; the first fixture profile when unset.
    pub profile: Option<String>,
    pub traffic_type: String,
    pub concurrency: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            traffic_type: "voice".to_string(),
            concurrency: 120.0,
        }
    }
}

/// Bounds of the concurrency slider. Submitted values are clamped into
/// `[min, max]`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 500.0,
            step: 10.0,
        }
    }
}

impl SliderConfig {
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.slider.min.is_finite() && self.slider.max.is_finite())
            || self.slider.min > self.slider.max
        {
            anyhow::bail!(
                "Invalid slider bounds: min={} max={}",
                self.slider.min,
                self.slider.max
            );
        }
        Ok(())
    }

    /// Socket address string for the dashboard listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
