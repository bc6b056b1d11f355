//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::retrace::RetraceOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retrace: RetraceOptions,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Batch retracing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of parallel workers
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Appended to the input file name to name the output file
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

/// Upper bound for `batch.workers`.
pub const MAX_WORKERS: usize = 32;

pub fn default_workers() -> usize {
    4
}

pub fn default_output_suffix() -> String {
    ".retraced".to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl BatchConfig {
    /// Validate batch configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("batch.workers must be > 0".to_string());
        }
        if self.workers > MAX_WORKERS {
            return Err(format!(
                "batch.workers {} exceeds maximum ({})",
                self.workers, MAX_WORKERS
            ));
        }
        if self.output_suffix.is_empty() {
            return Err("batch.output_suffix must not be empty".to_string());
        }
        if self.output_suffix.contains(['/', '\\']) {
            return Err(format!(
                "batch.output_suffix '{}' must not contain path separators",
                self.output_suffix
            ));
        }
        Ok(())
    }
}
