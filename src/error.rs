//! Error types for the retrace library.
//!
//! Retracing itself never fails on text input: lines that don't match any
//! template and frames without a mapping are passed through. Errors only
//! arise from user-supplied templates and from malformed test fixtures.

use std::path::PathBuf;

/// Errors that can occur while configuring a retracer.
#[derive(Debug, thiserror::Error)]
pub enum RetraceError {
    #[error("Invalid line template `{template}`: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors that can occur while loading XML test fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Invalid fixture: missing <test name=\"...\" expectedWarnings=\"...\"> element")]
    MissingTestElement,

    #[error("Failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
