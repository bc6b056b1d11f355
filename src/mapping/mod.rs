//! ProGuard/R8 mapping file parsing.
//!
//! A mapping file lists each renamed class followed by its renamed members:
//!
//! ```text
//! # comment
//! com.example.Foo -> a:
//!     java.lang.String name -> a
//!     1:3:void bar(int,java.lang.String):42:44 -> b
//!     4:4:void com.example.Other.inlined():7:7 -> b
//! ```
//!
//! [`MappingReader`] walks the lines and reports every entry to a
//! [`MappingProcessor`].

mod reader;

pub use reader::{MappingReader, MappingSummary};

/// A method mapping entry, as reported to [`MappingProcessor::process_method_mapping`].
///
/// Line numbers are 0 when unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMapping<'a> {
    /// Original class, which differs from the class block for inlined methods.
    pub class_name: &'a str,
    pub first_line_number: i64,
    pub last_line_number: i64,
    pub return_type: &'a str,
    pub method_name: &'a str,
    pub arguments: &'a str,
    /// Obfuscated name of the enclosing class block.
    pub new_class_name: &'a str,
    pub new_first_line_number: i64,
    pub new_last_line_number: i64,
    pub new_method_name: &'a str,
    /// The entry starts with an `obFirst:obLast:` prefix.
    pub has_obfuscated_line_info: bool,
    /// The entry has an `:origFirst[:origLast]` suffix.
    pub has_original_line_info: bool,
}

/// Receives the entries of a mapping file.
pub trait MappingProcessor {
    /// Process a class mapping. Returns whether the processor wants the
    /// member mappings of this class.
    fn process_class_mapping(&mut self, class_name: &str, new_class_name: &str) -> bool;

    /// Process a field mapping.
    ///
    /// `class_name` is the original class (possibly overridden by a qualified
    /// field name), `new_class_name` the obfuscated name of the class block.
    fn process_field_mapping(
        &mut self,
        class_name: &str,
        field_type: &str,
        field_name: &str,
        new_class_name: &str,
        new_field_name: &str,
    );

    /// Process a method mapping.
    fn process_method_mapping(&mut self, mapping: &MethodMapping<'_>);
}
