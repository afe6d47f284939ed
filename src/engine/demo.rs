//! Demo orchestration.
//!
//! `DemoContext` holds the loaded fixture and is written exactly once.
//! `DemoView` is the page state: current form selections, the pending
//! slider label, and the last successfully rendered simulation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::simulator::generate_sessions;
use crate::config::{DefaultsConfig, SliderConfig};
use crate::types::{DemoData, DemoError, PerfProfile, SimulationResult, TrafficType};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The loaded fixture plus where and when it came from.
#[derive(Debug, Clone)]
pub struct DemoContext {
    pub data: DemoData,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl DemoContext {
    pub fn new(data: DemoData, source: impl Into<String>) -> Self {
        Self {
            data,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn profile(&self, name: &str) -> Result<&PerfProfile, DemoError> {
        self.data
            .find_profile(name)
            .ok_or_else(|| DemoError::UnknownProfile(name.to_string()))
    }

    /// Resolve raw form input and run the engine.
    pub fn run_simulation(
        &self,
        input: &FormInput,
        slider: &SliderConfig,
    ) -> Result<(Selection, SimulationResult), DemoError> {
        let selection = input.resolve(slider)?;
        let profile = self.profile(&selection.profile)?;
        let result = generate_sessions(profile, selection.traffic_type, selection.concurrency);
        Ok((selection, result))
    }
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Raw values as submitted by the form or query string. Missing fields
/// decode as empty strings and fail validation like any other bad value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub profile: String,
    pub traffic_type: String,
    pub concurrency: String,
}

/// Validated form selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub profile: String,
    pub traffic_type: TrafficType,
    pub concurrency: f64,
}

impl FormInput {
    /// Parse the traffic type and concurrency. Concurrency must be a finite
    /// number and is clamped into the slider bounds.
    pub fn resolve(&self, slider: &SliderConfig) -> Result<Selection, DemoError> {
        let traffic_type: TrafficType = self.traffic_type.parse()?;
        let concurrency = parse_concurrency(&self.concurrency)?;
        Ok(Selection {
            profile: self.profile.clone(),
            traffic_type,
            concurrency: slider.clamp(concurrency),
        })
    }
}

pub fn parse_concurrency(raw: &str) -> Result<f64, DemoError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DemoError::InvalidConcurrency(raw.to_string())),
    }
}

impl From<&Selection> for FormInput {
    fn from(s: &Selection) -> Self {
        FormInput {
            profile: s.profile.clone(),
            traffic_type: s.traffic_type.key().to_string(),
            concurrency: s.concurrency.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Page state between requests.
#[derive(Debug, Clone)]
pub struct DemoView {
    pub slider: SliderConfig,
    /// Values last submitted (or the defaults before the first run).
    pub form: FormInput,
    /// Value shown next to the slider. Moves with the slider, not with
    /// submissions alone.
    pub concurrency_label: f64,
    /// Last successful run. Kept when a later submission fails.
    pub rendered: Option<SimulationResult>,
    pub last_error: Option<DemoError>,
    pub runs: u64,
}

impl DemoView {
    pub fn new(defaults: &DefaultsConfig, slider: SliderConfig) -> Self {
        let concurrency = slider.clamp(defaults.concurrency);
        Self {
            slider,
            form: FormInput {
                profile: defaults.profile.clone().unwrap_or_default(),
                traffic_type: defaults.traffic_type.clone(),
                concurrency: concurrency.to_string(),
            },
            concurrency_label: concurrency,
            rendered: None,
            last_error: None,
            runs: 0,
        }
    }

    /// Fill in the default profile from the fixture and run the initial
    /// simulation.
    pub fn initialize(&mut self, ctx: &DemoContext) -> Result<&SimulationResult, DemoError> {
        if self.form.profile.is_empty() {
            match ctx.data.perf_profiles.first() {
                Some(p) => self.form.profile = p.name.clone(),
                None => {
                    warn!(source = %ctx.source, "Fixture has no perf profiles");
                    let err = DemoError::NoProfiles;
                    self.last_error = Some(err.clone());
                    return Err(err);
                }
            }
        }
        let form = self.form.clone();
        self.submit(ctx, form)
    }

    /// Slider movement: update the displayed label only.
    ///
    /// In the served page the label follows the slider client-side (inline
    /// script in `render/templates/index.html`) and the value reaches the server
    /// only on form submission; this keeps the same behaviour for views
    /// driven in-process.
    pub fn set_concurrency_input(&mut self, value: f64) {
        if value.is_finite() {
            self.concurrency_label = self.slider.clamp(value);
        }
    }

    /// Form submission: re-run the simulation with `input`. On failure the
    /// previous rendering stays in place and the error is recorded.
    pub fn submit(
        &mut self,
        ctx: &DemoContext,
        input: FormInput,
    ) -> Result<&SimulationResult, DemoError> {
        match ctx.run_simulation(&input, &self.slider) {
            Ok((selection, result)) => {
                self.runs += 1;
                self.concurrency_label = selection.concurrency;
                self.form = FormInput::from(&selection);
                self.last_error = None;
                info!(
                    run = self.runs,
                    profile = %selection.profile,
                    traffic_type = %selection.traffic_type,
                    concurrency = selection.concurrency,
                    throughput_gbps = format!("{:.2}", result.metrics.throughput_gbps),
                    "Simulation run"
                );
                Ok(&*self.rendered.insert(result))
            }
            Err(e) => {
                warn!(error = %e, profile = %input.profile, "Simulation rejected");
                debug!(kept_previous = self.rendered.is_some(), "Keeping prior rendering");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// The currently selected traffic type, if the stored key is valid.
    pub fn traffic_type(&self) -> Option<TrafficType> {
        self.form.traffic_type.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DemoContext {
        DemoContext::new(DemoData::sample(), "memory")
    }

    fn input(profile: &str, traffic: &str, concurrency: &str) -> FormInput {
        FormInput {
            profile: profile.into(),
            traffic_type: traffic.into(),
            concurrency: concurrency.into(),
        }
    }

    fn fresh_view() -> DemoView {
        DemoView::new(&DefaultsConfig::default(), SliderConfig::default())
    }

    #[test]
    fn test_initialize_picks_first_profile() {
        let mut view = fresh_view();
        let result = view.initialize(&ctx()).unwrap().clone();
        assert_eq!(view.form.profile, "edge");
        assert_eq!(result.sessions[0].session_id, "EDGE-001");
        assert_eq!(view.runs, 1);
    }

    #[test]
    fn test_initialize_uses_configured_profile() {
        let defaults = DefaultsConfig {
            profile: Some("testcases_F08".into()),
            ..DefaultsConfig::default()
        };
        let mut view = DemoView::new(&defaults, SliderConfig::default());
        let result = view.initialize(&ctx()).unwrap();
        assert_eq!(result.sessions[0].session_id, "TESTCASES_F08-001");
    }

    #[test]
    fn test_initialize_without_profiles() {
        let empty = DemoContext::new(
            DemoData { repo: None, overview: vec![], components: vec![], perf_profiles: vec![] },
            "memory",
        );
        let mut view = fresh_view();
        assert_eq!(view.initialize(&empty).unwrap_err(), DemoError::NoProfiles);
        assert!(view.rendered.is_none());

        let doc = crate::render::render_document(&view, Some(&empty));
        assert_eq!(doc.banner, "Fixture has no perf profiles");
    }

    #[test]
    fn test_form_input_missing_fields_fail_validation() {
        let partial: FormInput =
            serde_json::from_str(r#"{"traffic_type": "voice", "concurrency": "120"}"#).unwrap();
        assert!(partial.profile.is_empty());
        let err = ctx().run_simulation(&partial, &SliderConfig::default()).unwrap_err();
        assert_eq!(err, DemoError::UnknownProfile(String::new()));

        let partial: FormInput = serde_json::from_str(r#"{"profile": "edge"}"#).unwrap();
        let err = ctx().run_simulation(&partial, &SliderConfig::default()).unwrap_err();
        assert!(err.is_lookup());
    }

    #[test]
    fn test_run_simulation_matches_engine() {
        let (sel, result) = ctx()
            .run_simulation(&input("edge", "voice", "100"), &SliderConfig::default())
            .unwrap();
        assert_eq!(sel.traffic_type, TrafficType::Voice);
        assert!((result.metrics.throughput_gbps - 1.19).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_profile_is_lookup_error() {
        let err = ctx()
            .run_simulation(&input("ghost", "voice", "100"), &SliderConfig::default())
            .unwrap_err();
        assert_eq!(err, DemoError::UnknownProfile("ghost".into()));
    }

    #[test]
    fn test_unknown_traffic_type() {
        let err = ctx()
            .run_simulation(&input("edge", "fax", "100"), &SliderConfig::default())
            .unwrap_err();
        assert_eq!(err, DemoError::UnknownTrafficType("fax".into()));
    }

    #[test]
    fn test_concurrency_validation() {
        assert_eq!(parse_concurrency(" 42 ").unwrap(), 42.0);
        assert!(parse_concurrency("abc").is_err());
        assert!(parse_concurrency("NaN").is_err());
        assert!(parse_concurrency("inf").is_err());
    }

    #[test]
    fn test_concurrency_clamped_to_slider() {
        let (sel, _) = ctx()
            .run_simulation(&input("edge", "iot", "100000"), &SliderConfig::default())
            .unwrap();
        assert_eq!(sel.concurrency, 500.0);
        let (sel, _) = ctx()
            .run_simulation(&input("edge", "iot", "-5"), &SliderConfig::default())
            .unwrap();
        assert_eq!(sel.concurrency, 10.0);
    }

    #[test]
    fn test_slider_input_does_not_rerun() {
        let mut view = fresh_view();
        view.initialize(&ctx()).unwrap();
        let before = view.rendered.clone();

        view.set_concurrency_input(400.0);

        assert_eq!(view.concurrency_label, 400.0);
        assert_eq!(view.rendered, before);
        assert_eq!(view.runs, 1);
        assert_eq!(view.form.concurrency, "120");
    }

    #[test]
    fn test_submit_applies_slider_value() {
        let mut view = fresh_view();
        let c = ctx();
        view.initialize(&c).unwrap();
        let before = view.rendered.clone().unwrap();

        view.set_concurrency_input(400.0);
        let mut form = view.form.clone();
        form.concurrency = "400".into();
        let after = view.submit(&c, form).unwrap().clone();

        assert_ne!(before.metrics, after.metrics);
        assert_eq!(view.runs, 2);
        assert_eq!(view.concurrency_label, 400.0);
    }

    #[test]
    fn test_failed_submit_keeps_prior_rendering() {
        let mut view = fresh_view();
        let c = ctx();
        view.initialize(&c).unwrap();
        let before = view.rendered.clone();

        let err = view.submit(&c, input("ghost", "voice", "100")).unwrap_err();

        assert!(err.is_lookup());
        assert_eq!(view.rendered, before);
        assert_eq!(view.last_error, Some(err));
        assert_eq!(view.form.profile, "edge");

        view.submit(&c, input("edge", "video", "100")).unwrap();
        assert!(view.last_error.is_none());
        assert_eq!(view.traffic_type(), Some(TrafficType::Video));
    }

    #[test]
    fn test_form_input_from_selection() {
        let sel = Selection {
            profile: "edge".into(),
            traffic_type: TrafficType::Iot,
            concurrency: 250.0,
        };
        let form = FormInput::from(&sel);
        assert_eq!(form, input("edge", "iot", "250"));
    }
}
