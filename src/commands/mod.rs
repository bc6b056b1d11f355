//! Command handlers for the retrace CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod batch;
pub mod check;
pub mod completions;
pub mod config;
pub mod trace;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use retrace::cli::RetraceArgs;
use retrace::{Config, Retracer};

/// Build a retracer from the configuration and command-line overrides.
pub fn build_retracer(config: &Config, args: &RetraceArgs) -> Result<Retracer> {
    let options = config.retrace_options(
        args.verbose,
        args.all_class_names,
        args.regular_expression.as_deref(),
        args.regular_expression2.as_deref(),
    );
    Retracer::new(&options).context("Invalid retrace options")
}

/// Read a mapping file.
pub fn read_mapping(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read mapping file: {:?}", path))
}

/// Read a text file, or stdin if the path is `-` or absent.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read stack trace: {:?}", path)),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stack trace from stdin")?;
            Ok(input)
        }
    }
}
