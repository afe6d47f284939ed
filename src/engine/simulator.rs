//! Synthetic session generator.
//!
//! Maps a profile, traffic type and concurrency level to eight session
//! records plus aggregate KPIs using closed-form arithmetic. Pure and
//! deterministic: identical inputs always produce identical output.

use tracing::debug;

use crate::types::{Metrics, PerfProfile, Session, SimulationResult, TrafficType};

/// Sessions generated per run.
pub const SESSIONS_PER_RUN: usize = 8;

pub const LATENCY_MIN_MS: f64 = 1.2;
pub const LATENCY_MAX_MS: f64 = 20.0;
pub const SESSION_RELIABILITY_MIN: f64 = 0.95;
pub const AGGREGATE_RELIABILITY_MIN: f64 = 0.97;
pub const RELIABILITY_MAX: f64 = 0.99999;
pub const GPU_LOAD_MIN: f64 = 8.0;
pub const GPU_LOAD_MAX: f64 = 100.0;
pub const MIN_PRBS: i64 = 8;

/// Clamp `value` into `[min, max]`. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round half toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
///
/// Matches the rounding used to produce the reference numbers; `f64::round`
/// rounds half away from zero, which differs for negative halves.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Derived per-run constants shared by every session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseValues {
    pub density: f64,
    pub base_latency: f64,
    pub base_prb: f64,
    pub reliability: f64,
}

impl BaseValues {
    pub fn derive(profile: &PerfProfile, traffic_type: TrafficType) -> Self {
        let tuning = traffic_type.tuning();
        let groups = profile.groups as f64;
        let density = profile.density();

        Self {
            density,
            base_latency: 2.4 + groups * 0.4 + tuning.latency_bias,
            base_prb: round_half_up((14.0 + density) * tuning.prb_scale),
            reliability: clamp(
                0.992 + tuning.reliability_boost - groups * 0.0007,
                AGGREGATE_RELIABILITY_MIN,
                RELIABILITY_MAX,
            ),
        }
    }
}

/// Zero-padded session identifier: `edge`, 0 -> `EDGE-001`.
pub fn session_id(profile_name: &str, index: usize) -> String {
    format!("{}-{:03}", profile_name.to_uppercase(), index + 1)
}

/// Generate eight synthetic sessions and the aggregate metrics.
pub fn generate_sessions(
    profile: &PerfProfile,
    traffic_type: TrafficType,
    concurrency: f64,
) -> SimulationResult {
    let tuning = traffic_type.tuning();
    let base = BaseValues::derive(profile, traffic_type);

    let sessions: Vec<Session> = (0..SESSIONS_PER_RUN)
        .map(|idx| {
            let jitter = ((idx % 3) as f64 - 1.0) * 0.28;
            let prbs = round_half_up(base.base_prb + (idx * 2) as f64) as i64;
            Session {
                session_id: session_id(&profile.name, idx),
                slice: tuning.slice.to_string(),
                prbs: prbs.max(MIN_PRBS),
                latency_ms: clamp(
                    base.base_latency + jitter + concurrency / 140.0,
                    LATENCY_MIN_MS,
                    LATENCY_MAX_MS,
                ),
                reliability: clamp(
                    base.reliability - idx as f64 * 0.0003,
                    SESSION_RELIABILITY_MIN,
                    RELIABILITY_MAX,
                ),
            }
        })
        .collect();

    let avg_latency_ms =
        sessions.iter().map(|s| s.latency_ms).sum::<f64>() / sessions.len() as f64;
    let throughput_factor = if traffic_type == TrafficType::Video { 0.0016 } else { 0.0007 };
    let throughput_gbps = concurrency * base.base_prb * throughput_factor;
    let gpu_load = clamp(
        concurrency / 2.2 + profile.groups as f64 * 2.3,
        GPU_LOAD_MIN,
        GPU_LOAD_MAX,
    );

    debug!(
        profile = %profile.name,
        traffic_type = %traffic_type,
        concurrency,
        density = base.density,
        base_prb = base.base_prb,
        base_latency = format!("{:.3}", base.base_latency),
        "Sessions generated"
    );

    SimulationResult {
        sessions,
        metrics: Metrics {
            throughput_gbps,
            avg_latency_ms,
            reliability: base.reliability,
            gpu_load,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
