//! Fixture builder.
//!
//! Regenerates `data/demo-data.json` from an Aerial SDK checkout:
//! overview bullets from `README.md`, per-component file counts, and one
//! profile per `testBenches/perf/testcases_*.json` file.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::types::{ComponentStat, DemoData, PerfProfile};

pub const REPO_TITLE: &str = "NVIDIA Aerial CUDA-Accelerated RAN";

/// Line in README.md that opens the overview bullet list.
const OVERVIEW_MARKER: &str = "The **Aerial CUDA-Accelerated RAN** SDK includes:";

/// Sample scenario ids kept per profile.
const MAX_SAMPLE_SCENARIOS: usize = 4;

pub const COMPONENT_DIRS: &[(&str, &str)] = &[
    ("cuPHY", "GPU-accelerated 5G PHY"),
    ("cuMAC", "GPU-accelerated MAC scheduler"),
    ("pyaerial", "Python APIs for research and integration"),
    ("testBenches", "Validation and performance tooling"),
    ("testVectors", "Reference vectors"),
    ("5GModel", "Waveform generation models"),
];

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Extract the SDK bullet list from README text.
///
/// Collects `- **Name**: text` lines after the marker line until the next
/// `### ` heading, rewriting each as `Name: text`.
pub fn read_overview(readme: &str) -> Vec<String> {
    let mut bullets = Vec::new();
    let mut in_section = false;

    for line in readme.lines() {
        if line.trim() == OVERVIEW_MARKER {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        if line.starts_with("### ") {
            break;
        }
        if line.starts_with("- **") {
            bullets.push(strip_bold_label(line).trim().to_string());
        }
    }
    bullets
}

/// `- **Name**: text` -> `Name: text`. Lines without a closing `**:` are
/// returned unchanged.
fn strip_bold_label(line: &str) -> String {
    let Some(rest) = line.strip_prefix("- **") else {
        return line.to_string();
    };
    // The label must be at least one character long.
    let Some(first) = rest.chars().next() else {
        return line.to_string();
    };
    let skip = first.len_utf8();
    match rest[skip..].find("**:") {
        Some(pos) => {
            let label = &rest[..skip + pos];
            let after = &rest[skip + pos + 3..];
            let text = after.strip_prefix(' ').unwrap_or(after);
            format!("{label}: {text}")
        }
        None => line.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Count regular files under `dir`, recursively. Missing directories count
/// as zero.
pub fn count_files(dir: &Path) -> u64 {
    if !dir.exists() {
        return 0;
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count() as u64
}

pub fn scan_component_stats(repo_root: &Path) -> Vec<ComponentStat> {
    COMPONENT_DIRS
        .iter()
        .map(|(name, description)| {
            let file_count = count_files(&repo_root.join(name));
            debug!(component = *name, file_count, "Component scanned");
            ComponentStat {
                name: name.to_string(),
                description: description.to_string(),
                file_count,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Perf profiles
// ---------------------------------------------------------------------------

/// Summarise one perf test-case payload into a profile.
///
/// `groups` counts top-level keys; `num_testcases` counts keys of every
/// object-valued group. Non-object payloads yield an empty profile.
pub fn profile_from_payload(name: &str, payload: &Value) -> PerfProfile {
    let mut profile = PerfProfile::new(name, 0, 0);
    let Value::Object(groups) = payload else {
        return profile;
    };

    let mut scenario_ids = BTreeSet::new();
    let mut testcases = 0usize;
    for group in groups.values() {
        if let Value::Object(cases) = group {
            testcases += cases.len();
            scenario_ids.extend(cases.keys().cloned());
        }
    }

    profile.groups = groups.len() as u32;
    profile.num_testcases = testcases as u32;
    profile.sample_scenarios = scenario_ids.into_iter().take(MAX_SAMPLE_SCENARIOS).collect();
    profile
}

fn is_perf_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("testcases_") && n.ends_with(".json"))
        .unwrap_or(false)
}

/// Load every `testcases_*.json` under `perf_dir`, sorted by path.
pub fn load_perf_profiles(perf_dir: &Path) -> Result<Vec<PerfProfile>> {
    if !perf_dir.exists() {
        warn!(path = %perf_dir.display(), "Perf directory not found");
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(perf_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_perf_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let mut profiles = Vec::with_capacity(paths.len());
    for path in paths {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let payload: Value = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let profile = profile_from_payload(name, &payload);
        debug!(
            profile = %profile.name,
            groups = profile.groups,
            testcases = profile.num_testcases,
            "Perf profile loaded"
        );
        profiles.push(profile);
    }
    Ok(profiles)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the full fixture from an SDK checkout.
pub fn build_demo_data(repo_root: &Path) -> Result<DemoData> {
    let readme_path = repo_root.join("README.md");
    let readme = std::fs::read_to_string(&readme_path)
        .with_context(|| format!("Failed to read {}", readme_path.display()))?;

    let data = DemoData {
        repo: Some(REPO_TITLE.to_string()),
        overview: read_overview(&readme),
        components: scan_component_stats(repo_root),
        perf_profiles: load_perf_profiles(&repo_root.join("testBenches").join("perf"))?,
    };

    info!(
        root = %repo_root.display(),
        overview_items = data.overview.len(),
        profiles = data.perf_profiles.len(),
        "Demo data built"
    );
    Ok(data)
}

/// Write the fixture as pretty-printed JSON, creating parent directories.
pub fn write_fixture(data: &DemoData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(data).context("Failed to serialise demo data")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write fixture to {}", path.display()))?;
    info!(path = %path.display(), "Fixture written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
