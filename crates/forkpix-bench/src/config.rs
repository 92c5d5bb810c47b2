use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use forkpix_core::DEFAULT_THRESHOLD;
use forkpix_core::exec::fork_join::check_threshold;

/// Worker counts swept by a benchmark: `1..=MAX_WORKERS`.
pub const MAX_WORKERS: usize = 12;

/// Benchmark settings. Missing fields in a config file take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Largest row range a leaf task processes without splitting.
    pub threshold: u32,
    /// Parallel runs use 1..=max_workers threads; speedup is measured at
    /// max_workers.
    pub max_workers: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_workers: MAX_WORKERS,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> forkpix_core::Result<()> {
        check_threshold(self.threshold)?;
        if self.max_workers == 0 {
            return Err(forkpix_core::Error::InvalidWorkerCount(self.max_workers));
        }
        Ok(())
    }
}
