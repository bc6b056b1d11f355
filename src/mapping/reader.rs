//! Line-by-line mapping file reader.
//!
//! Malformed lines are skipped rather than reported: a mapping file is
//! usually produced by a tool, and a partially readable mapping still
//! retraces most frames.

use tracing::{debug, trace};

use super::{MappingProcessor, MethodMapping};

/// Counts of the entries a [`MappingReader`] reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingSummary {
    pub classes: usize,
    pub fields: usize,
    pub methods: usize,
    /// Lines that looked like entries but could not be parsed.
    pub skipped: usize,
}

/// Parses mapping file content and presents the entries to a processor.
pub struct MappingReader<'a> {
    content: &'a str,
}

/// The class block that member lines currently belong to.
struct ClassBlock<'a> {
    class_name: &'a str,
    new_class_name: &'a str,
}

/// A parsed member line, before it is split into field or method.
struct MemberLine<'a> {
    obfuscated_range: Option<(i64, i64)>,
    member_type: &'a str,
    name: &'a str,
    /// Present for methods only.
    arguments: Option<&'a str>,
    original_range: Option<(i64, i64)>,
    new_name: &'a str,
}

impl<'a> MappingReader<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Read the whole mapping, presenting every entry to the processor.
    pub fn pump<P: MappingProcessor + ?Sized>(&self, processor: &mut P) -> MappingSummary {
        let mut summary = MappingSummary::default();
        let mut block: Option<ClassBlock<'a>> = None;

        for (line_number, raw_line) in self.content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.ends_with(':') {
                block = match parse_class_line(line) {
                    Some((class_name, new_class_name)) => {
                        summary.classes += 1;
                        processor
                            .process_class_mapping(class_name, new_class_name)
                            .then_some(ClassBlock {
                                class_name,
                                new_class_name,
                            })
                    }
                    None => {
                        trace!(line = line_number + 1, text = line, "Skipping malformed class mapping");
                        summary.skipped += 1;
                        None
                    }
                };
                continue;
            }

            let Some(current) = &block else {
                continue;
            };

            match parse_member_line(line) {
                Some(member) => {
                    report_member(current, &member, processor, &mut summary);
                }
                None => {
                    trace!(line = line_number + 1, text = line, "Skipping malformed member mapping");
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            classes = summary.classes,
            fields = summary.fields,
            methods = summary.methods,
            skipped = summary.skipped,
            "Read mapping"
        );
        summary
    }
}

/// Parse `original -> obfuscated:`.
fn parse_class_line(line: &str) -> Option<(&str, &str)> {
    let arrow = line.find("->")?;
    let colon = arrow + 2 + line[arrow + 2..].find(':')?;

    let class_name = line[..arrow].trim();
    let new_class_name = line[arrow + 2..colon].trim();
    if class_name.is_empty() || new_class_name.is_empty() {
        return None;
    }
    Some((class_name, new_class_name))
}

/// Parse `[a:b:]type name[(args)][:c[:d]] -> newName`.
fn parse_member_line(line: &str) -> Option<MemberLine<'_>> {
    let (obfuscated_range, rest) = match split_line_range_prefix(line) {
        Some((first, last, rest)) => (Some((first, last)), rest),
        None => (None, line),
    };

    let arrow = rest.rfind("->")?;
    let new_name = rest[arrow + 2..].trim();
    let declaration = rest[..arrow].trim();

    let space = declaration.find(' ')?;
    let member_type = declaration[..space].trim();
    let remainder = declaration[space + 1..].trim();

    let (name, arguments, original_range) = match remainder.find('(') {
        Some(open) => {
            let close = open + 1 + remainder[open + 1..].find(')')?;
            let suffix = remainder[close + 1..].trim();
            (
                remainder[..open].trim(),
                Some(remainder[open + 1..close].trim()),
                parse_line_range_suffix(suffix)?,
            )
        }
        None => (remainder, None, None),
    };

    if member_type.is_empty() || name.is_empty() || new_name.is_empty() {
        return None;
    }

    Some(MemberLine {
        obfuscated_range,
        member_type,
        name,
        arguments,
        original_range,
        new_name,
    })
}

/// Split a leading `first:last:` line range off a member line.
fn split_line_range_prefix(line: &str) -> Option<(i64, i64, &str)> {
    let (first, rest) = line.split_once(':')?;
    let (last, rest) = rest.split_once(':')?;
    let first = first.trim().parse().ok()?;
    let last = last.trim().parse().ok()?;
    Some((first, last, rest))
}

/// Parse the `:first[:last]` suffix after a method's argument list.
///
/// The outer `Option` is `None` when the suffix is malformed; the inner one
/// is `None` when there is no suffix at all.
fn parse_line_range_suffix(suffix: &str) -> Option<Option<(i64, i64)>> {
    if suffix.is_empty() {
        return Some(None);
    }
    let numbers = suffix.strip_prefix(':')?;
    let (first, last) = match numbers.split_once(':') {
        Some((first, last)) => (first.trim().parse().ok()?, last.trim().parse().ok()?),
        None => {
            let first = numbers.trim().parse().ok()?;
            (first, first)
        }
    };
    Some(Some((first, last)))
}

fn report_member<P: MappingProcessor + ?Sized>(
    block: &ClassBlock<'_>,
    member: &MemberLine<'_>,
    processor: &mut P,
    summary: &mut MappingSummary,
) {
    // A qualified member name was inlined from another class.
    let (class_name, name) = match member.name.rfind('.') {
        Some(dot) => (&member.name[..dot], &member.name[dot + 1..]),
        None => (block.class_name, member.name),
    };
    if name.is_empty() {
        summary.skipped += 1;
        return;
    }

    let Some(arguments) = member.arguments else {
        summary.fields += 1;
        processor.process_field_mapping(
            class_name,
            member.member_type,
            name,
            block.new_class_name,
            member.new_name,
        );
        return;
    };

    let (new_first, new_last) = member.obfuscated_range.unwrap_or((0, 0));
    // Without an explicit original range, lines were not renumbered.
    let (first, last) = member.original_range.unwrap_or((new_first, new_last));

    summary.methods += 1;
    processor.process_method_mapping(&MethodMapping {
        class_name,
        first_line_number: first,
        last_line_number: last,
        return_type: member.member_type,
        method_name: name,
        arguments,
        new_class_name: block.new_class_name,
        new_first_line_number: new_first,
        new_last_line_number: new_last,
        new_method_name: member.new_name,
        has_obfuscated_line_info: member.obfuscated_range.is_some(),
        has_original_line_info: member.original_range.is_some(),
    });
}
