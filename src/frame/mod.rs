//! Stack frame information and the line templates that extract it.
//!
//! # Structure
//!
//! - [`FrameInfo`] - everything a template can capture from one line
//! - [`FramePattern`] - one compiled template: parse a line, re-render it
//! - [`PatternSet`] - an ordered list of templates, first match wins

mod pattern;

pub use pattern::{FramePattern, Placeholder, MAX_PLACEHOLDERS};

use std::fmt;

use crate::error::RetraceError;

/// The class name, field name, method name, etc. possibly found in a stack
/// frame. Values that are not present are `None`; an unknown line number
/// is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub class_name: Option<String>,
    pub source_file: Option<String>,
    pub line_number: i64,
    /// Field type or method return type.
    pub r#type: Option<String>,
    pub field_name: Option<String>,
    pub method_name: Option<String>,
    /// Comma-separated argument types.
    pub method_arguments: Option<String>,
}

impl FrameInfo {
    /// A frame that only names a method of a class.
    pub fn method(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        source_file: Option<&str>,
        line_number: i64,
    ) -> Self {
        Self {
            class_name: Some(class_name.into()),
            source_file: source_file.map(str::to_string),
            line_number,
            method_name: Some(method_name.into()),
            ..Self::default()
        }
    }

    pub fn class_name_or_empty(&self) -> &str {
        self.class_name.as_deref().unwrap_or("")
    }

    pub fn source_file_is(&self, name: &str) -> bool {
        self.source_file.as_deref() == Some(name)
    }
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FrameInfo(class=[{:?}], line=[{}], type=[{:?}], field=[{:?}], method=[{:?}], arguments=[{:?}])",
            self.class_name,
            self.line_number,
            self.r#type,
            self.field_name,
            self.method_name,
            self.method_arguments
        )
    }
}

/// An ordered list of compiled templates.
///
/// Lines are matched against the templates in order and the first one that
/// matches the whole line wins. The winning template is returned alongside
/// the frame so that the same template re-renders the line.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<FramePattern>,
}

impl PatternSet {
    /// Compile every template, in priority order.
    pub fn compile<I, S>(templates: I, verbose: bool) -> Result<Self, RetraceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = templates
            .into_iter()
            .map(|template| FramePattern::new(template.as_ref(), verbose))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The same templates with a different verbose flag.
    pub fn with_verbose(&self, verbose: bool) -> Self {
        Self {
            patterns: self
                .patterns
                .iter()
                .map(|pattern| pattern.with_verbose(verbose))
                .collect(),
        }
    }

    /// Parse the line with the first template that matches it.
    pub fn parse(&self, line: &str) -> Option<(&FramePattern, FrameInfo)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.parse(line).map(|frame| (pattern, frame)))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
