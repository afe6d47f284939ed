//! In-memory fixture source for integration testing.
//!
//! Provides a deterministic `FixtureSource` that serves a known fixture,
//! or a forced failure, and counts how often it was fetched.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use aerial_demo::fixture::FixtureSource;
use aerial_demo::types::{DemoData, DemoError, PerfProfile};

pub struct StaticSource {
    data: DemoData,
    fetches: AtomicUsize,
    /// If set, every fetch returns this error.
    force_error: Mutex<Option<DemoError>>,
}

impl StaticSource {
    pub fn new(data: DemoData) -> Self {
        Self {
            data,
            fetches: AtomicUsize::new(0),
            force_error: Mutex::new(None),
        }
    }

    /// A fixture with the reference `edge` profile first.
    pub fn reference() -> Self {
        Self::new(DemoData {
            repo: Some("NVIDIA Aerial CUDA-Accelerated RAN".to_string()),
            overview: vec![
                "cuPHY: GPU-accelerated 5G PHY".to_string(),
                "cuMAC: GPU-accelerated MAC scheduler".to_string(),
                "pyAerial: Python APIs for research".to_string(),
            ],
            components: Vec::new(),
            perf_profiles: vec![
                PerfProfile::new("edge", 2, 20),
                PerfProfile::new("testcases_F08", 6, 84),
                PerfProfile::new("testcases_F14", 4, 40),
            ],
        })
    }

    pub fn set_error(&self, err: DemoError) {
        *self.force_error.lock().unwrap() = Some(err);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FixtureSource for StaticSource {
    async fn fetch(&self) -> Result<DemoData, DemoError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.force_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.data.clone())
    }

    fn describe(&self) -> String {
        "static://reference".to_string()
    }
}
