//! Template compiler for stack frame lines.
//!
//! A template is regular expression text with two-character placeholders:
//!
//! | placeholder | captures |
//! |-------------|----------|
//! | `%c` | class name (`com.example.Foo`) |
//! | `%C` | slashed class name (`com/example/Foo`) |
//! | `%s` | source file (may be empty, never starts with a digit) |
//! | `%l` | line number |
//! | `%t` | type (`java.lang.String[]`) |
//! | `%f` | field name |
//! | `%m` | method name |
//! | `%a` | comma-separated argument types |
//!
//! Every placeholder becomes one capturing group, and the whole expression is
//! anchored to the entire line. [`FramePattern::format`] re-matches the
//! original line and only replaces the captured spans, so the literal text of
//! the line survives unchanged.
//!
//! # Example
//!
//! ```
//! use retrace::frame::{FrameInfo, FramePattern};
//!
//! let pattern = FramePattern::new(r"\s*at %c\.%m\(%s:%l\)", false)?;
//! let frame = pattern.parse("    at a.b(SourceFile:3)").unwrap();
//! assert_eq!(frame.class_name.as_deref(), Some("a"));
//! assert_eq!(frame.line_number, 3);
//!
//! let original = FrameInfo::method("com.example.Foo", "bar", Some("Foo.java"), 42);
//! let line = pattern.format("    at a.b(SourceFile:3)", &original).unwrap();
//! assert_eq!(line, "    at com.example.Foo.bar(Foo.java:42)");
//! # Ok::<(), retrace::RetraceError>(())
//! ```

use regex::Regex;

use super::FrameInfo;
use crate::class_name::{external_class_name, internal_class_name};
use crate::error::RetraceError;

/// Templates stop recognizing placeholders after this many.
pub const MAX_PLACEHOLDERS: usize = 32;

// \b misbehaves around some unicode characters, so class and member
// patterns are spelled out with negated character classes instead.
const REGEX_CLASS: &str = r#"(?:[^\s":./()]+\.)*[^\s":./()]+"#;
const REGEX_CLASS_SLASH: &str = r#"(?:[^\s":./()]+/)*[^\s":./()]+"#;
// A leading digit would be indistinguishable from a line number.
const REGEX_SOURCE_FILE: &str = r"(?:[^:()\d][^:()]*)?";
const REGEX_LINE_NUMBER: &str = r"-?\b[0-9]+\b";
const REGEX_MEMBER: &str = r#"<?[^\s":./()]+>?"#;

/// The kind of value a placeholder captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Class,
    SlashedClass,
    SourceFile,
    LineNumber,
    Type,
    Field,
    Method,
    Arguments,
    /// An unrecognized `%x`: compiles to an empty group and is ignored.
    Unsupported(char),
}

impl Placeholder {
    pub fn from_code(code: char) -> Self {
        match code {
            'c' => Placeholder::Class,
            'C' => Placeholder::SlashedClass,
            's' => Placeholder::SourceFile,
            'l' => Placeholder::LineNumber,
            't' => Placeholder::Type,
            'f' => Placeholder::Field,
            'm' => Placeholder::Method,
            'a' => Placeholder::Arguments,
            other => Placeholder::Unsupported(other),
        }
    }

    pub fn to_code(&self) -> char {
        match self {
            Placeholder::Class => 'c',
            Placeholder::SlashedClass => 'C',
            Placeholder::SourceFile => 's',
            Placeholder::LineNumber => 'l',
            Placeholder::Type => 't',
            Placeholder::Field => 'f',
            Placeholder::Method => 'm',
            Placeholder::Arguments => 'a',
            Placeholder::Unsupported(code) => *code,
        }
    }

    fn regex(&self) -> String {
        match self {
            Placeholder::Class => REGEX_CLASS.to_string(),
            Placeholder::SlashedClass => REGEX_CLASS_SLASH.to_string(),
            Placeholder::SourceFile => REGEX_SOURCE_FILE.to_string(),
            Placeholder::LineNumber => REGEX_LINE_NUMBER.to_string(),
            Placeholder::Type => regex_type(),
            Placeholder::Field | Placeholder::Method => REGEX_MEMBER.to_string(),
            Placeholder::Arguments => {
                let ty = regex_type();
                format!(r"(?:{ty}(?:\s*,\s*{ty})*)?")
            }
            Placeholder::Unsupported(_) => String::new(),
        }
    }
}

fn regex_type() -> String {
    format!(r"{}(?:\[\])*", REGEX_CLASS)
}

/// A compiled line template that can parse and format stack frame lines.
#[derive(Debug, Clone)]
pub struct FramePattern {
    template: String,
    regex: Regex,
    placeholders: Vec<Placeholder>,
    verbose: bool,
}

impl FramePattern {
    /// Compile a template.
    ///
    /// With `verbose`, formatted field names are prefixed with their type and
    /// formatted method names also get their return type and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RetraceError::InvalidTemplate`] if the expanded expression is
    /// not a valid regular expression.
    pub fn new(template: &str, verbose: bool) -> Result<Self, RetraceError> {
        let mut expression = String::with_capacity(template.len() * 4);
        let mut placeholders = Vec::new();

        let mut index = 0;
        while placeholders.len() < MAX_PLACEHOLDERS {
            let Some(offset) = template[index..].find('%') else {
                break;
            };
            let percent = index + offset;
            let Some(code) = template[percent + 1..].chars().next() else {
                break;
            };

            let placeholder = Placeholder::from_code(code);
            expression.push_str(&template[index..percent]);
            expression.push('(');
            expression.push_str(&placeholder.regex());
            expression.push(')');
            placeholders.push(placeholder);

            index = percent + 1 + code.len_utf8();
        }
        expression.push_str(&template[index..]);

        let regex = Regex::new(&format!("^(?:{})$", expression)).map_err(|source| {
            RetraceError::InvalidTemplate {
                template: template.to_string(),
                source,
            }
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            placeholders,
            verbose,
        })
    }

    /// The same template with a different verbose flag.
    pub fn with_verbose(&self, verbose: bool) -> Self {
        Self {
            verbose,
            ..self.clone()
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the whole line matches the template.
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Parse all frame information from a line.
    ///
    /// Returns `None` if the whole line doesn't match the template, or if its
    /// line number doesn't fit an `i64`.
    pub fn parse(&self, line: &str) -> Option<FrameInfo> {
        let captures = self.regex.captures(line)?;
        let mut frame = FrameInfo::default();

        for (index, placeholder) in self.placeholders.iter().enumerate() {
            let Some(capture) = captures.get(index + 1) else {
                continue;
            };
            let value = capture.as_str();
            match placeholder {
                Placeholder::Class => frame.class_name = Some(value.to_string()),
                Placeholder::SlashedClass => frame.class_name = Some(external_class_name(value)),
                Placeholder::SourceFile => {
                    frame.source_file = (!value.is_empty()).then(|| value.to_string());
                }
                Placeholder::LineNumber => frame.line_number = value.parse().ok()?,
                Placeholder::Type => frame.r#type = Some(value.to_string()),
                Placeholder::Field => frame.field_name = Some(value.to_string()),
                Placeholder::Method => frame.method_name = Some(value.to_string()),
                Placeholder::Arguments => frame.method_arguments = Some(value.to_string()),
                Placeholder::Unsupported(_) => {}
            }
        }

        Some(frame)
    }

    /// Format frame information into a line, using `line` as the skeleton.
    ///
    /// This is the reverse of [`parse`](Self::parse): the captured spans of
    /// `line` are replaced with the values of `frame`, everything else is
    /// copied. Returns `None` if `line` doesn't match the template.
    pub fn format(&self, line: &str, frame: &FrameInfo) -> Option<String> {
        let captures = self.regex.captures(line)?;
        let mut formatted = String::with_capacity(line.len() + 32);
        let mut line_index = 0;

        for (index, placeholder) in self.placeholders.iter().enumerate() {
            let Some(capture) = captures.get(index + 1) else {
                continue;
            };

            formatted.push_str(&line[line_index..capture.start()]);

            match placeholder {
                Placeholder::Class => formatted.push_str(frame.class_name_or_empty()),
                Placeholder::SlashedClass => {
                    formatted.push_str(&internal_class_name(frame.class_name_or_empty()))
                }
                Placeholder::SourceFile => {
                    formatted.push_str(frame.source_file.as_deref().unwrap_or(""))
                }
                Placeholder::LineNumber => {
                    if !formatted.is_empty() && !formatted.ends_with(':') {
                        formatted.push(':');
                    }
                    formatted.push_str(&frame.line_number.to_string());
                }
                Placeholder::Type => formatted.push_str(frame.r#type.as_deref().unwrap_or("")),
                Placeholder::Field => {
                    if self.verbose {
                        formatted.push_str(frame.r#type.as_deref().unwrap_or(""));
                        formatted.push(' ');
                    }
                    formatted.push_str(frame.field_name.as_deref().unwrap_or(""));
                }
                Placeholder::Method => {
                    if self.verbose {
                        formatted.push_str(frame.r#type.as_deref().unwrap_or(""));
                        formatted.push(' ');
                    }
                    formatted.push_str(frame.method_name.as_deref().unwrap_or(""));
                    if self.verbose {
                        formatted.push('(');
                        formatted.push_str(frame.method_arguments.as_deref().unwrap_or(""));
                        formatted.push(')');
                    }
                }
                Placeholder::Arguments => {
                    formatted.push_str(frame.method_arguments.as_deref().unwrap_or(""))
                }
                Placeholder::Unsupported(_) => {}
            }

            line_index = capture.end();
        }

        formatted.push_str(&line[line_index..]);
        Some(formatted)
    }
}
