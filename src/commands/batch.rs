//! Batch command handler

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use retrace::batch::{retrace_batch, RetraceJob};
use retrace::cli::RetraceArgs;
use retrace::Config;

use super::{build_retracer, read_mapping};

/// Where the retraced version of `input` is written.
pub fn output_path(input: &Path, out_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let mut file_name = input
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "trace".into());
    file_name.push(suffix);

    match out_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Retrace every trace file with one mapping and write the results.
pub fn handle(
    config: &Config,
    mapping: &Path,
    traces: &[PathBuf],
    out_dir: Option<&Path>,
    jobs: Option<usize>,
    args: &RetraceArgs,
) -> Result<()> {
    let workers = jobs.unwrap_or(config.batch.workers);
    if workers == 0 {
        anyhow::bail!("--jobs must be > 0");
    }

    let retracer = build_retracer(config, args)?;
    let mapping = read_mapping(mapping)?;

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    let jobs = traces
        .iter()
        .map(|path| {
            let stack_trace = fs::read_to_string(path)
                .with_context(|| format!("Failed to read stack trace: {:?}", path))?;
            Ok(RetraceJob {
                name: path.to_string_lossy().into_owned(),
                stack_trace,
                mapping: mapping.as_str(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let start = Instant::now();
    let outputs = retrace_batch(&retracer, jobs, workers);
    let elapsed = start.elapsed();

    let mut total_lines = 0;
    for (input, output) in traces.iter().zip(&outputs) {
        let path = output_path(input, out_dir, &config.batch.output_suffix);
        fs::write(&path, &output.retraced)
            .with_context(|| format!("Failed to write output file: {:?}", path))?;
        println!("  {} -> {}", output.name, path.display());
        total_lines += output.lines;
    }

    println!(
        "Retraced {} file(s), {} line(s) in {:.2}s using {} worker(s)",
        outputs.len(),
        total_lines,
        elapsed.as_secs_f64(),
        workers
    );

    Ok(())
}
