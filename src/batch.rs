//! Parallel retracing of independent stack traces using Rayon.
//!
//! Every job builds its own symbol table, so jobs may use different mapping
//! files. Results are returned in job order.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::retrace::Retracer;

/// One stack trace to retrace.
#[derive(Debug, Clone)]
pub struct RetraceJob<'a> {
    /// Label used to report the result, usually the input file name.
    pub name: String,
    pub stack_trace: String,
    pub mapping: &'a str,
}

/// The outcome of a [`RetraceJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetraceOutput {
    pub name: String,
    pub retraced: String,
    /// Number of input lines.
    pub lines: usize,
}

fn run_job(retracer: &Retracer, job: RetraceJob<'_>) -> RetraceOutput {
    let retraced = retracer.retrace(&job.stack_trace, job.mapping);
    RetraceOutput {
        lines: job.stack_trace.split('\n').count(),
        name: job.name,
        retraced,
    }
}

/// Retrace all jobs on a dedicated pool of `workers` threads.
///
/// Falls back to processing the jobs on the calling thread if the pool can't
/// be built.
pub fn retrace_batch(
    retracer: &Retracer,
    jobs: Vec<RetraceJob<'_>>,
    workers: usize,
) -> Vec<RetraceOutput> {
    let workers = workers.max(1);
    debug!(jobs = jobs.len(), workers, "Retracing batch");

    if workers == 1 || jobs.len() <= 1 {
        return jobs.into_iter().map(|job| run_job(retracer, job)).collect();
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("retrace-{}", i))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "Failed to create thread pool, processing sequentially");
            return jobs.into_iter().map(|job| run_job(retracer, job)).collect();
        }
    };

    pool.install(|| {
        jobs.into_par_iter()
            .map(|job| run_job(retracer, job))
            .collect()
    })
}
