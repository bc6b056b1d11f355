//! Text-level heuristics applied around frame translation.

use std::sync::LazyLock;

use regex::Regex;

use crate::remapper::FrameRemapper;

static CIRCULAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[CIRCULAR REFERENCE: ([^\]]+)\]").expect("valid circular reference regex")
});

static INDENTED_AT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+at\b").expect("valid indented frame regex"));

static SPACE_INDENTED_AT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ ]+at\b").expect("valid space indented frame regex"));

static TRAILING_COMMA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n,[ \t]*$").expect("valid trailing comma regex"));

/// The class named by a `[CIRCULAR REFERENCE: X]` marker, if the line is one.
pub fn circular_reference(line: &str) -> Option<&str> {
    CIRCULAR_REFERENCE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|class| class.as_str())
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_token_delimiter(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | '{' | '}' | '(' | ')' | '/' | '\\' | ':' | ';' | ',' | ' ' | '\'' | '"' | '<' | '>'
    )
}

/// Replace the leading characters `line` shares with `previous` by spaces,
/// keeping whitespace and the identifier the two lines diverge in.
///
/// A line identical to (or a prefix of) `previous` is blanked entirely.
pub fn blank_common_prefix(line: &str, previous: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let common = chars
        .iter()
        .zip(previous.chars())
        .take_while(|(a, b)| **a == *b)
        .count();

    let blank_end = if common == chars.len() {
        chars.len()
    } else {
        chars[..=common]
            .iter()
            .rposition(|c| !is_identifier_part(*c))
            .map_or(0, |index| index + 1)
    };

    chars
        .iter()
        .enumerate()
        .map(|(index, c)| {
            if index < blank_end && !c.is_whitespace() {
                ' '
            } else {
                *c
            }
        })
        .collect()
}

/// Map every token of the line through the class map. Tokens are separated
/// by brackets, punctuation, quotes and spaces, which are kept.
pub fn deobfuscate_tokens(line: &str, remapper: &FrameRemapper) -> String {
    let mut deobfuscated = String::with_capacity(line.len());
    let mut token_start = 0;

    for (index, c) in line.char_indices() {
        if is_token_delimiter(c) {
            deobfuscated.push_str(remapper.original_class_name(&line[token_start..index]));
            deobfuscated.push(c);
            token_start = index + c.len_utf8();
        }
    }
    deobfuscated.push_str(remapper.original_class_name(&line[token_start..]));

    deobfuscated
}

/// Join the per-line results into the final trace.
///
/// A trace made only of frame lines (no exception or message line) gets its
/// space indentation removed, then a trailing `,` line loses trailing blanks.
pub fn assemble(lines: Vec<String>) -> String {
    let has_exception_line = lines.iter().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with(',') && !INDENTED_AT.is_match(line)
    });

    let lines: Vec<String> = if has_exception_line {
        lines
    } else {
        lines
            .into_iter()
            .map(|line| {
                if SPACE_INDENTED_AT.is_match(&line) && !line.contains("(Class.java") {
                    line.trim_start().to_string()
                } else {
                    line
                }
            })
            .collect()
    };

    TRAILING_COMMA_LINE
        .replace(&lines.join("\n"), "\n,")
        .into_owned()
}
