//! Stack trace retracing.
//!
//! [`Retracer`] owns the compiled line templates. Each call builds a
//! [`FrameRemapper`] from the mapping, then translates the trace line by line:
//!
//! 1. `[CIRCULAR REFERENCE: X]` markers for mapped classes are only unindented.
//! 2. Lines that already name an original method are left alone.
//! 3. Other parsed frames are transformed; ambiguous results produce one line
//!    per candidate, with the shared prefix blanked when the line number is
//!    unknown. Unresolved method frames may get their source file normalized.
//! 4. A second, narrower template set parses the obfuscated line again and
//!    resolves the other reference of "Cannot invoke ... because the return
//!    value of ..." in the retraced text.

mod heuristics;
mod templates;

pub use templates::{primary as primary_templates, secondary as secondary_templates};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::class_name::source_file_name;
use crate::error::RetraceError;
use crate::frame::{FrameInfo, FramePattern, PatternSet};
use crate::remapper::{FrameRemapper, SOURCE_FILE, UNKNOWN_SOURCE};

use heuristics::{assemble, blank_common_prefix, circular_reference, deobfuscate_tokens};
use templates::{DEFAULT_PRIMARY, DEFAULT_SECONDARY};

const NATIVE_METHOD: &str = "Native Method";

/// Retracing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetraceOptions {
    /// Render return types and arguments of methods, and types of fields.
    pub verbose: bool,
    /// Also map every class-name-like token of lines no template matches.
    pub all_class_names: bool,
    /// Replaces the built-in primary templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_expression: Option<String>,
    /// Replaces the built-in secondary template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_expression2: Option<String>,
}

/// De-obfuscates stack traces with a mapping file.
///
/// A `Retracer` is immutable and can be shared between threads; every call
/// to [`retrace`](Self::retrace) builds its own symbol table.
#[derive(Debug, Clone)]
pub struct Retracer {
    primary: PatternSet,
    secondary: PatternSet,
    all_class_names: bool,
}

impl Default for Retracer {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.clone(),
            secondary: DEFAULT_SECONDARY.clone(),
            all_class_names: false,
        }
    }
}

impl Retracer {
    /// Create a retracer, compiling custom templates if given.
    ///
    /// # Errors
    ///
    /// Returns [`RetraceError::InvalidTemplate`] if a custom template is not
    /// a valid expression.
    pub fn new(options: &RetraceOptions) -> Result<Self, RetraceError> {
        let primary = compile_or_default(
            options.regular_expression.as_deref(),
            &DEFAULT_PRIMARY,
            options.verbose,
        )?;
        let secondary = compile_or_default(
            options.regular_expression2.as_deref(),
            &DEFAULT_SECONDARY,
            options.verbose,
        )?;

        Ok(Self {
            primary,
            secondary,
            all_class_names: options.all_class_names,
        })
    }

    /// A retracer with the built-in templates.
    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            primary: DEFAULT_PRIMARY.with_verbose(verbose),
            secondary: DEFAULT_SECONDARY.with_verbose(verbose),
            all_class_names: false,
        }
    }

    /// Retrace a stack trace with the given mapping file content.
    pub fn retrace(&self, stack_trace: &str, mapping: &str) -> String {
        let remapper = FrameRemapper::from_mapping(mapping);
        self.retrace_with_remapper(stack_trace, &remapper)
    }

    /// Retrace a stack trace with an already populated symbol table.
    pub fn retrace_with_remapper(&self, stack_trace: &str, remapper: &FrameRemapper) -> String {
        let lines: Vec<String> = stack_trace
            .split('\n')
            .map(|line| self.retrace_line(line, remapper))
            .collect();

        debug!(
            lines = lines.len(),
            classes = remapper.class_count(),
            "Retraced stack trace"
        );

        assemble(lines)
    }

    fn retrace_line(&self, line: &str, remapper: &FrameRemapper) -> String {
        if let Some(class_name) = circular_reference(line) {
            if remapper.original_class_name(class_name) != class_name {
                return line.trim_start().to_string();
            }
        }

        let retraced = match self.primary.parse(line) {
            Some((pattern, frame)) => self.retrace_frame(pattern, &frame, line, remapper),
            None if self.all_class_names => deobfuscate_tokens(line, remapper),
            None => line.to_string(),
        };

        // The secondary frame comes from the obfuscated line. Only candidate
        // lines still matching the template are rewritten; blanked
        // alternatives are kept as they are.
        let Some((pattern, frame)) = self.secondary.parse(line) else {
            return retraced;
        };

        retraced
            .split('\n')
            .map(|candidate| {
                if pattern.is_match(candidate) {
                    self.retrace_frame(pattern, &frame, candidate, remapper)
                } else {
                    candidate.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn retrace_frame(
        &self,
        pattern: &FramePattern,
        frame: &FrameInfo,
        line: &str,
        remapper: &FrameRemapper,
    ) -> String {
        if names_original_method(frame, remapper) {
            trace!(line, "Frame already names an original method");
            return line.to_string();
        }

        match remapper.transform(frame) {
            Some(candidates) => self.render_candidates(pattern, frame, &candidates, line, remapper),
            None => match frame.method_name.as_deref() {
                Some(method_name) => {
                    normalize_source_file(pattern, frame, method_name, line, remapper)
                }
                None => line.to_string(),
            },
        }
    }

    fn render_candidates(
        &self,
        pattern: &FramePattern,
        frame: &FrameInfo,
        candidates: &[FrameInfo],
        line: &str,
        remapper: &FrameRemapper,
    ) -> String {
        let mut rendered = Vec::with_capacity(candidates.len());
        let mut previous: Option<String> = None;

        for candidate in candidates {
            let Some(retraced) = pattern.format(line, candidate) else {
                continue;
            };

            let mut output = match &previous {
                Some(previous) if frame.line_number == 0 => blank_common_prefix(&retraced, previous),
                _ => retraced.clone(),
            };
            if self.all_class_names {
                output = deobfuscate_tokens(&output, remapper);
            }

            rendered.push(output);
            previous = Some(retraced);
        }

        if candidates.len() > 1 {
            trace!(line, candidates = candidates.len(), "Ambiguous frame");
        }

        rendered.join("\n")
    }
}

fn compile_or_default(
    template: Option<&str>,
    default: &PatternSet,
    verbose: bool,
) -> Result<PatternSet, RetraceError> {
    match template.filter(|template| !template.is_empty()) {
        Some(template) => PatternSet::compile([template], verbose),
        None => Ok(default.with_verbose(verbose)),
    }
}

/// Whether the frame has a real line number and source file and names a
/// method the mapping knows, meaning the line was never obfuscated.
fn names_original_method(frame: &FrameInfo, remapper: &FrameRemapper) -> bool {
    let real_source_file = frame
        .source_file
        .as_deref()
        .is_some_and(|source| source != UNKNOWN_SOURCE && source != SOURCE_FILE);

    frame.line_number != 0
        && real_source_file
        && frame
            .method_name
            .as_deref()
            .is_some_and(|method| remapper.has_method_mapping(frame.class_name_or_empty(), method))
}

/// Rewrite the source file of an unresolved method frame to the
/// conventional file of its class, when the current one looks synthetic.
fn normalize_source_file(
    pattern: &FramePattern,
    frame: &FrameInfo,
    method_name: &str,
    line: &str,
    remapper: &FrameRemapper,
) -> String {
    let class_name = frame.class_name_or_empty();
    let has_method_mapping = remapper.has_method_mapping(class_name, method_name);
    let source_file = frame.source_file.as_deref().unwrap_or("");

    let synthetic_source_file = !has_method_mapping
        && source_file != UNKNOWN_SOURCE
        && !source_file.is_empty()
        && (source_file == NATIVE_METHOD
            || (source_file == SOURCE_FILE
                && frame.line_number == 0
                && class_name.chars().count() <= 3)
            || source_file.contains('.')
            || source_file.chars().count() <= 3);

    let missing_source_file = source_file.is_empty()
        && class_name.contains('.')
        && (!has_method_mapping
            || remapper.has_method_mapping_with_obfuscated_line_info(class_name, method_name));

    if !(synthetic_source_file || missing_source_file) {
        return line.to_string();
    }

    let normalized = FrameInfo {
        source_file: if class_name.is_empty() {
            frame.source_file.clone()
        } else {
            Some(source_file_name(class_name))
        },
        ..frame.clone()
    };
    trace!(line, source_file = ?normalized.source_file, "Normalized source file");

    pattern
        .format(line, &normalized)
        .unwrap_or_else(|| line.to_string())
}

/// Retrace a stack trace with the built-in templates.
///
/// # Example
///
/// ```
/// let mapping = "com.example.MyClass -> a:\n    1:1:void doThing():42:42 -> a\n";
/// let trace = "java.lang.NullPointerException\n    at a.a(Unknown Source:10)";
///
/// assert_eq!(
///     retrace::retrace(trace, mapping),
///     "java.lang.NullPointerException\n    at com.example.MyClass.a(Unknown Source:10)"
/// );
/// ```
pub fn retrace(stack_trace: &str, mapping: &str) -> String {
    Retracer::default().retrace(stack_trace, mapping)
}

/// Retrace a stack trace with the given options.
///
/// # Errors
///
/// Returns [`RetraceError::InvalidTemplate`] if a custom template is invalid.
pub fn retrace_with(
    stack_trace: &str,
    mapping: &str,
    options: &RetraceOptions,
) -> Result<String, RetraceError> {
    Ok(Retracer::new(options)?.retrace(stack_trace, mapping))
}
