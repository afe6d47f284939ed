//! Shared types for the Aerial demo.
//!
//! The fixture model (`DemoData`, `PerfProfile`, `ComponentStat`) mirrors the
//! JSON produced by the data builder. Simulation output (`Session`,
//! `Metrics`, `SimulationResult`) is transient and recomputed on every run.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A named deployment-scale profile loaded from the fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfProfile {
    pub name: String,
    /// Number of test-case groups in the source perf file.
    pub groups: u32,
    /// Total test cases across all groups.
    pub num_testcases: u32,
    #[serde(default)]
    pub sample_scenarios: Vec<String>,
}

impl fmt::Display for PerfProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} scenarios)", self.name, self.num_testcases)
    }
}

impl PerfProfile {
    pub fn new(name: impl Into<String>, groups: u32, num_testcases: u32) -> Self {
        Self {
            name: name.into(),
            groups,
            num_testcases,
            sample_scenarios: Vec::new(),
        }
    }

    /// Test cases per group. Profiles with zero groups count as one group.
    pub fn density(&self) -> f64 {
        self.num_testcases as f64 / self.groups.max(1) as f64
    }
}

/// File count for one top-level SDK component directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStat {
    pub name: String,
    pub description: String,
    pub file_count: u64,
}

/// The demo fixture (`data/demo-data.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    pub overview: Vec<String>,
    #[serde(default)]
    pub components: Vec<ComponentStat>,
    pub perf_profiles: Vec<PerfProfile>,
}

impl DemoData {
    /// Find a profile by exact name.
    pub fn find_profile(&self, name: &str) -> Option<&PerfProfile> {
        self.perf_profiles.iter().find(|p| p.name == name)
    }

    #[cfg(test)]
    pub fn sample() -> Self {
        DemoData {
            repo: Some("NVIDIA Aerial CUDA-Accelerated RAN".to_string()),
            overview: vec![
                "cuPHY: GPU-accelerated 5G PHY layer".to_string(),
                "cuMAC: GPU-accelerated MAC scheduler".to_string(),
            ],
            components: Vec::new(),
            perf_profiles: vec![
                PerfProfile::new("edge", 2, 20),
                PerfProfile::new("testcases_F08", 6, 84),
                PerfProfile::new("empty", 0, 0),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Traffic types
// ---------------------------------------------------------------------------

/// Workload category selected in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficType {
    Voice,
    Video,
    Iot,
}

/// Tuning constants applied per traffic type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficTuning {
    pub latency_bias: f64,
    pub prb_scale: f64,
    pub reliability_boost: f64,
    pub slice: &'static str,
}

const VOICE_TUNING: TrafficTuning = TrafficTuning {
    latency_bias: -0.8,
    prb_scale: 0.7,
    reliability_boost: 0.003,
    slice: "URLLC",
};

const VIDEO_TUNING: TrafficTuning = TrafficTuning {
    latency_bias: 1.9,
    prb_scale: 1.5,
    reliability_boost: -0.004,
    slice: "eMBB",
};

const IOT_TUNING: TrafficTuning = TrafficTuning {
    latency_bias: 0.2,
    prb_scale: 0.45,
    reliability_boost: 0.006,
    slice: "mMTC",
};

impl TrafficType {
    /// All known traffic types, in form order.
    pub const ALL: &'static [TrafficType] =
        &[TrafficType::Voice, TrafficType::Video, TrafficType::Iot];

    /// The form/API key for this traffic type.
    pub fn key(&self) -> &'static str {
        match self {
            TrafficType::Voice => "voice",
            TrafficType::Video => "video",
            TrafficType::Iot => "iot",
        }
    }

    pub fn tuning(&self) -> &'static TrafficTuning {
        match self {
            TrafficType::Voice => &VOICE_TUNING,
            TrafficType::Video => &VIDEO_TUNING,
            TrafficType::Iot => &IOT_TUNING,
        }
    }

    /// Human-readable label used in the traffic-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            TrafficType::Voice => "Voice (URLLC)",
            TrafficType::Video => "Video (eMBB)",
            TrafficType::Iot => "IoT (mMTC)",
        }
    }
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for TrafficType {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voice" => Ok(TrafficType::Voice),
            "video" => Ok(TrafficType::Video),
            "iot" => Ok(TrafficType::Iot),
            _ => Err(DemoError::UnknownTrafficType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation output
// ---------------------------------------------------------------------------

/// One synthetic connection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub slice: String,
    pub prbs: i64,
    pub latency_ms: f64,
    /// Fraction in 0..1.
    pub reliability: f64,
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] prbs={} latency={:.2}ms reliability={:.3}%",
            self.session_id,
            self.slice,
            self.prbs,
            self.latency_ms,
            self.reliability * 100.0,
        )
    }
}

/// Aggregate KPIs for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub throughput_gbps: f64,
    pub avg_latency_ms: f64,
    pub reliability: f64,
    pub gpu_load: f64,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "throughput={:.2} Gbps | latency={:.2} ms | reliability={:.3}% | gpu={:.1}/100",
            self.throughput_gbps,
            self.avg_latency_ms,
            self.reliability * 100.0,
            self.gpu_load,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub sessions: Vec<Session>,
    pub metrics: Metrics,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the demo.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DemoError {
    #[error("Failed to fetch fixture ({source_desc}): {message}")]
    Fetch { source_desc: String, message: String },

    #[error("Malformed fixture ({source_desc}): {message}")]
    MalformedFixture { source_desc: String, message: String },

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown traffic type: {0}")]
    UnknownTrafficType(String),

    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    #[error("Fixture has no perf profiles")]
    NoProfiles,

    #[error("Demo data not loaded")]
    NotLoaded,

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl DemoError {
    /// Whether this error came from a failed name lookup.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            DemoError::UnknownProfile(_) | DemoError::UnknownTrafficType(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
