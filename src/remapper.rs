//! Symbol table built from a mapping file, and the transformation of
//! obfuscated frames back into original frames.
//!
//! Members are indexed by original class name and obfuscated member name.
//! One obfuscated name can stand for several original members (overloads,
//! inlined calls), so every index entry is an insertion-ordered set of
//! descriptors; ambiguous frames come back as several candidates in mapping
//! order.

use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::trace;

use crate::class_name::source_file_name;
use crate::frame::FrameInfo;
use crate::mapping::{MappingProcessor, MappingReader, MethodMapping};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const SOURCE_FILE: &str = "SourceFile";

/// Original version of a field (without the obfuscated class or field name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FieldInfo {
    original_class_name: String,
    original_type: String,
    original_name: String,
}

impl FieldInfo {
    /// The given type may be a `None` wildcard.
    fn matches(&self, original_type: Option<&str>) -> bool {
        original_type.map_or(true, |ty| ty == self.original_type)
    }
}

/// Original version of a method (without the obfuscated class or method
/// name), plus the obfuscated line range it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MethodInfo {
    obfuscated_first_line_number: i64,
    obfuscated_last_line_number: i64,
    original_class_name: String,
    original_first_line_number: i64,
    original_last_line_number: i64,
    original_type: String,
    original_name: String,
    original_arguments: String,
    has_obfuscated_line_info: bool,
    has_original_line_info: bool,
}

impl MethodInfo {
    fn has_line_info(&self) -> bool {
        self.has_obfuscated_line_info || self.has_original_line_info
    }

    fn covers_line(&self, obfuscated_line_number: i64) -> bool {
        self.has_obfuscated_line_info
            && !(self.obfuscated_first_line_number == 0 && self.obfuscated_last_line_number == 0)
            && !(self.original_first_line_number == 0 && self.original_last_line_number == 0)
            && (self.obfuscated_first_line_number..=self.obfuscated_last_line_number)
                .contains(&obfuscated_line_number)
    }

    /// Whether the given properties match this method. Type and arguments
    /// may be `None` wildcards.
    fn matches(
        &self,
        obfuscated_line_number: i64,
        original_type: Option<&str>,
        original_arguments: Option<&str>,
    ) -> bool {
        let lines_match = if obfuscated_line_number == 0 {
            // Only methods without a line number table leave frames without lines
            !self.has_line_info()
        } else {
            self.covers_line(obfuscated_line_number)
        };

        lines_match
            && original_type.map_or(true, |ty| ty == self.original_type)
            && original_arguments.map_or(true, |args| args == self.original_arguments)
    }

    /// A "SourceFile" frame without a line number may still come from a
    /// method with a line table, when the call site line was stripped.
    fn matches_preamble(&self) -> bool {
        self.has_obfuscated_line_info && self.obfuscated_first_line_number > 0
    }

    /// The original line number for an obfuscated line number.
    fn original_line_number(&self, obfuscated_line_number: i64) -> i64 {
        if self.original_first_line_number == self.obfuscated_first_line_number {
            return obfuscated_line_number;
        }

        let can_shift = self.original_last_line_number != 0
            && self.original_last_line_number != self.original_first_line_number
            && self.obfuscated_first_line_number != 0
            && obfuscated_line_number != 0;

        if can_shift {
            self.original_first_line_number - self.obfuscated_first_line_number
                + obfuscated_line_number
        } else {
            self.original_first_line_number
        }
    }
}

type MemberIndex<T> = HashMap<String, HashMap<String, IndexSet<T>>>;

/// Accumulates mapping information and transforms stack frames accordingly.
///
/// Populate it through [`MappingProcessor`] (usually via
/// [`FrameRemapper::from_mapping`]), then only query it.
#[derive(Debug, Default)]
pub struct FrameRemapper {
    /// Obfuscated class name -> original class name.
    class_map: HashMap<String, String>,
    /// Original class name -> obfuscated field name -> fields.
    class_field_map: MemberIndex<FieldInfo>,
    /// Original class name -> obfuscated method name -> methods.
    class_method_map: MemberIndex<MethodInfo>,
}

impl FrameRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a remapper from mapping file content.
    pub fn from_mapping(mapping: &str) -> Self {
        let mut remapper = Self::new();
        MappingReader::new(mapping).pump(&mut remapper);
        remapper
    }

    pub fn class_count(&self) -> usize {
        self.class_map.len()
    }

    /// Transform an obfuscated frame back to one or more original frames.
    ///
    /// Returns `None` if the frame names a field or method that has no
    /// mapping. A class without a mapping is not an error: its name is kept.
    pub fn transform(&self, obfuscated_frame: &FrameInfo) -> Option<Vec<FrameInfo>> {
        let original_class_name = self.original_class_name(obfuscated_frame.class_name_or_empty());

        let mut original_frames = Vec::new();
        self.transform_field_info(obfuscated_frame, original_class_name, &mut original_frames);
        self.transform_method_info(obfuscated_frame, original_class_name, &mut original_frames);

        if original_frames.is_empty() {
            let unknown_source_with_line = obfuscated_frame.source_file_is(UNKNOWN_SOURCE)
                && obfuscated_frame.line_number > 0;
            let class_only =
                obfuscated_frame.method_name.is_none() && obfuscated_frame.field_name.is_none();

            if !(unknown_source_with_line || class_only) {
                trace!(frame = %obfuscated_frame, "No mapping for frame");
                return None;
            }

            original_frames.push(FrameInfo {
                class_name: obfuscated_frame
                    .class_name
                    .as_ref()
                    .map(|_| original_class_name.to_string()),
                ..obfuscated_frame.clone()
            });
        }

        Some(original_frames)
    }

    fn transform_field_info(
        &self,
        obfuscated_frame: &FrameInfo,
        original_class_name: &str,
        original_frames: &mut Vec<FrameInfo>,
    ) {
        let Some(field_name) = obfuscated_frame.field_name.as_deref() else {
            return;
        };
        let Some(fields) = self
            .class_field_map
            .get(original_class_name)
            .and_then(|fields| fields.get(field_name))
        else {
            return;
        };

        let original_type = obfuscated_frame
            .r#type
            .as_deref()
            .map(|ty| self.original_type(ty));

        for field in fields {
            if !field.matches(original_type.as_deref()) {
                continue;
            }
            original_frames.push(FrameInfo {
                class_name: Some(field.original_class_name.clone()),
                source_file: Some(resolve_source_file(obfuscated_frame, &field.original_class_name)),
                line_number: obfuscated_frame.line_number,
                r#type: Some(field.original_type.clone()),
                field_name: Some(field.original_name.clone()),
                method_name: obfuscated_frame.method_name.clone(),
                method_arguments: obfuscated_frame.method_arguments.clone(),
            });
        }
    }

    fn transform_method_info(
        &self,
        obfuscated_frame: &FrameInfo,
        original_class_name: &str,
        original_frames: &mut Vec<FrameInfo>,
    ) {
        let Some(method_name) = obfuscated_frame.method_name.as_deref() else {
            return;
        };
        let Some(methods) = self
            .class_method_map
            .get(original_class_name)
            .and_then(|methods| methods.get(method_name))
        else {
            return;
        };

        let line_number = obfuscated_frame.line_number;
        let allow_preamble_match = line_number == 0 && obfuscated_frame.source_file_is(SOURCE_FILE);
        let original_type = obfuscated_frame
            .r#type
            .as_deref()
            .map(|ty| self.original_type(ty));
        let original_arguments = obfuscated_frame
            .method_arguments
            .as_deref()
            .map(|args| self.original_arguments(args));

        for method in methods {
            let matched = method.matches(
                line_number,
                original_type.as_deref(),
                original_arguments.as_deref(),
            ) || (allow_preamble_match && method.matches_preamble());
            if !matched {
                continue;
            }

            original_frames.push(FrameInfo {
                class_name: Some(method.original_class_name.clone()),
                source_file: Some(resolve_source_file(
                    obfuscated_frame,
                    &method.original_class_name,
                )),
                line_number: method.original_line_number(line_number),
                r#type: Some(method.original_type.clone()),
                field_name: obfuscated_frame.field_name.clone(),
                method_name: Some(method.original_name.clone()),
                method_arguments: Some(method.original_arguments.clone()),
            });
        }
    }

    /// The original argument types of a comma-separated obfuscated list.
    fn original_arguments(&self, obfuscated_arguments: &str) -> String {
        obfuscated_arguments
            .split(',')
            .map(|argument| self.original_type(argument.trim()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The original type, keeping any array suffix.
    fn original_type(&self, obfuscated_type: &str) -> String {
        match obfuscated_type.find('[') {
            Some(index) => format!(
                "{}{}",
                self.original_class_name(&obfuscated_type[..index]),
                &obfuscated_type[index..]
            ),
            None => self.original_class_name(obfuscated_type).to_string(),
        }
    }

    /// The original class name, or the given name if it has no mapping.
    pub fn original_class_name<'a>(&'a self, obfuscated_class_name: &'a str) -> &'a str {
        self.class_map
            .get(obfuscated_class_name)
            .map_or(obfuscated_class_name, String::as_str)
    }

    /// Whether the class has any mapping for the obfuscated method name.
    pub fn has_method_mapping(&self, obfuscated_class_name: &str, obfuscated_method_name: &str) -> bool {
        self.methods(obfuscated_class_name, obfuscated_method_name)
            .is_some()
    }

    /// Whether the class has a mapping for the obfuscated method name that
    /// carries an obfuscated line range.
    pub fn has_method_mapping_with_obfuscated_line_info(
        &self,
        obfuscated_class_name: &str,
        obfuscated_method_name: &str,
    ) -> bool {
        self.methods(obfuscated_class_name, obfuscated_method_name)
            .is_some_and(|methods| {
                methods.iter().any(|method| {
                    method.has_obfuscated_line_info
                        && (method.obfuscated_first_line_number != 0
                            || method.obfuscated_last_line_number != 0)
                })
            })
    }

    fn methods(
        &self,
        obfuscated_class_name: &str,
        obfuscated_method_name: &str,
    ) -> Option<&IndexSet<MethodInfo>> {
        let original_class_name = self.original_class_name(obfuscated_class_name);
        self.class_method_map
            .get(original_class_name)
            .and_then(|methods| methods.get(obfuscated_method_name))
    }

    /// The original name of a class block, which members are indexed by.
    fn block_class_name(&self, new_class_name: &str) -> String {
        self.original_class_name(new_class_name).to_string()
    }
}

/// "Unknown Source" is kept; anything else becomes the conventional source
/// file of the original class.
fn resolve_source_file(obfuscated_frame: &FrameInfo, class_name: &str) -> String {
    if obfuscated_frame.source_file_is(UNKNOWN_SOURCE) {
        UNKNOWN_SOURCE.to_string()
    } else {
        source_file_name(class_name)
    }
}

impl MappingProcessor for FrameRemapper {
    fn process_class_mapping(&mut self, class_name: &str, new_class_name: &str) -> bool {
        self.class_map
            .insert(new_class_name.to_string(), class_name.to_string());
        true
    }

    fn process_field_mapping(
        &mut self,
        class_name: &str,
        field_type: &str,
        field_name: &str,
        new_class_name: &str,
        new_field_name: &str,
    ) {
        let block = self.block_class_name(new_class_name);
        self.class_field_map
            .entry(block)
            .or_default()
            .entry(new_field_name.to_string())
            .or_default()
            .insert(FieldInfo {
                original_class_name: class_name.to_string(),
                original_type: field_type.to_string(),
                original_name: field_name.to_string(),
            });
    }

    fn process_method_mapping(&mut self, mapping: &MethodMapping<'_>) {
        let block = self.block_class_name(mapping.new_class_name);
        self.class_method_map
            .entry(block)
            .or_default()
            .entry(mapping.new_method_name.to_string())
            .or_default()
            .insert(MethodInfo {
                obfuscated_first_line_number: mapping.new_first_line_number,
                obfuscated_last_line_number: mapping.new_last_line_number,
                original_class_name: mapping.class_name.to_string(),
                original_first_line_number: mapping.first_line_number,
                original_last_line_number: mapping.last_line_number,
                original_type: mapping.return_type.to_string(),
                original_name: mapping.method_name.to_string(),
                original_arguments: mapping.arguments.to_string(),
                has_obfuscated_line_info: mapping.has_obfuscated_line_info,
                has_original_line_info: mapping.has_original_line_info,
            });
    }
}
