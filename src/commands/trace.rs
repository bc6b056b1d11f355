//! Trace command handler

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use retrace::cli::RetraceArgs;
use retrace::Config;

use super::{build_retracer, read_input, read_mapping};

/// Retrace one stack trace and write it to `output` or stdout.
pub fn handle(
    config: &Config,
    mapping: &Path,
    stack_trace: Option<&Path>,
    output: Option<&Path>,
    args: &RetraceArgs,
) -> Result<()> {
    let retracer = build_retracer(config, args)?;
    let mapping = read_mapping(mapping)?;
    let stack_trace = read_input(stack_trace)?;

    let retraced = retracer.retrace(&stack_trace, &mapping);

    match output {
        Some(path) => fs::write(path, &retraced)
            .with_context(|| format!("Failed to write output file: {:?}", path))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(retraced.as_bytes())?;
            if !retraced.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }

    Ok(())
}
