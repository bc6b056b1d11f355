//! Retrace Library
//!
//! De-obfuscates Java/Android stack traces using a ProGuard/R8 mapping file.
//!
//! ```
//! let mapping = "com.example.Main -> a:\n    1:4:void run():10:13 -> b\n";
//! let trace = "java.lang.IllegalStateException\n\tat a.b(SourceFile:2)";
//!
//! assert_eq!(
//!     retrace::retrace(trace, mapping),
//!     "java.lang.IllegalStateException\n\tat com.example.Main.run(Main.java:11)"
//! );
//! ```

pub mod batch;
pub mod class_name;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixture;
pub mod frame;
pub mod mapping;
pub mod remapper;
pub mod retrace;

pub use config::Config;
pub use error::{FixtureError, RetraceError};
pub use fixture::{Fixture, FixtureOutcome};
pub use frame::{FrameInfo, FramePattern, PatternSet};
pub use mapping::{MappingProcessor, MappingReader, MappingSummary};
pub use remapper::FrameRemapper;
pub use retrace::{retrace, retrace_with, RetraceOptions, Retracer};
