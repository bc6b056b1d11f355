//! Built-in line templates, in priority order.

use std::sync::LazyLock;

use crate::frame::PatternSet;

// "    at com.example.Foo.bar(Foo.java:123:0) ~[0]", "at o.afc.b + 45(:45)",
// "at a.b()(Foo.java:1)" or no source line info at all.
pub const AT: &str = r".*?\bat\s+%c\.%m\s*(?:\+\s+[0-9]+)?(?:\(\))?(?:\((?:%s)(?::?%l)?(?::\d+)?\))?\s*(?:~\[.*\])?";

// Every line can only hold one class, so the first form avoids matching long
// unobfuscated target names.
pub const CAST1: &str = r".*?\bjava\.lang\.ClassCastException: %c cannot be cast to .{5,}";
pub const CAST2: &str = r".*?\bjava\.lang\.ClassCastException: .* cannot be cast to %c";

pub const NULL_FIELD_READ: &str = r".*?\bjava\.lang\.NullPointerException: Attempt to read from field '%t %c\.%f' on a null object reference";
pub const NULL_FIELD_WRITE: &str = r".*?\bjava\.lang\.NullPointerException: Attempt to write to field '%t %c\.%f' on a null object reference";
pub const NULL_METHOD: &str = r".*?\bjava\.lang\.NullPointerException: Attempt to invoke (?:virtual|interface) method '%t %c\.%m\(%a\)' on a null object reference";

// Cannot invoke "a.b.c(int)" because the return value of "a.b.d()" is null
pub const RETURN_VALUE_NULL1: &str = r#".*?\bjava\.lang\.NullPointerException: Cannot invoke ".*" because the return value of "%c\.%m\(%a\)" is null"#;
pub const RETURN_VALUE_NULL2: &str = r#".*?\bjava\.lang\.NullPointerException: Cannot invoke "%c\.%m\(%a\)" because the return value of ".*" is null"#;

// Cannot invoke "java.net.ServerSocket.close()" because "a.b.c" is null
pub const BECAUSE_IS_NULL: &str = r#".*?\bbecause "%c\.%f" is null"#;

// "Caused by: com.example.FooException: something"
pub const THROW: &str = r#"(?:.*?[:"]\s+)?%c(?::.*)?"#;

/// Templates tried on every line, first match wins.
pub fn primary() -> [&'static str; 10] {
    [
        AT,
        CAST1,
        CAST2,
        NULL_FIELD_READ,
        NULL_FIELD_WRITE,
        NULL_METHOD,
        RETURN_VALUE_NULL1,
        RETURN_VALUE_NULL2,
        BECAUSE_IS_NULL,
        THROW,
    ]
}

/// Templates tried on the obfuscated line after the primary pass, to resolve the other
/// reference of "Cannot invoke ... because the return value of ..." lines.
pub fn secondary() -> [&'static str; 1] {
    [RETURN_VALUE_NULL2]
}

pub static DEFAULT_PRIMARY: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile(primary(), false).expect("built-in templates are valid")
});

pub static DEFAULT_SECONDARY: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile(secondary(), false).expect("built-in templates are valid")
});
