//! Configuration management for retrace

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::retrace::RetraceOptions;

impl Config {
    /// Get the config file path (~/.config/retrace/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Get the config directory path (~/.config/retrace)
    pub fn config_dir() -> Result<PathBuf> {
        io::config_dir()
    }

    /// Load configuration from the default path, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load()
    }

    /// Load configuration from a file, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Parse and validate configuration text
    pub fn parse(contents: &str) -> Result<Self> {
        io::parse(contents)
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        io::to_toml(self)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), String> {
        self.batch.validate()
    }

    /// Retrace options with command-line overrides applied.
    ///
    /// Flags can only turn options on; templates replace configured ones.
    pub fn retrace_options(
        &self,
        verbose: bool,
        all_class_names: bool,
        regular_expression: Option<&str>,
        regular_expression2: Option<&str>,
    ) -> RetraceOptions {
        RetraceOptions {
            verbose: self.retrace.verbose || verbose,
            all_class_names: self.retrace.all_class_names || all_class_names,
            regular_expression: regular_expression
                .map(str::to_string)
                .or_else(|| self.retrace.regular_expression.clone()),
            regular_expression2: regular_expression2
                .map(str::to_string)
                .or_else(|| self.retrace.regular_expression2.clone()),
        }
    }
}
