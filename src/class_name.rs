//! Conversions between external (`com.example.Foo`) and internal
//! (`com/example/Foo`) class name notations.

/// Converts an internal class name (`/` package separators) into an
/// external class name (`.` package separators).
pub fn external_class_name(internal_class_name: &str) -> String {
    internal_class_name.replace('/', ".")
}

/// Converts an external class name (`.` package separators) into an
/// internal class name (`/` package separators).
pub fn internal_class_name(external_class_name: &str) -> String {
    external_class_name.replace('.', "/")
}

/// Returns the Java source file name that typically declares the given
/// class: the simple name without package and without any `$Inner` suffix,
/// plus `.java`.
pub fn source_file_name(class_name: &str) -> String {
    let simple_start = class_name.rfind('.').map_or(0, |index| index + 1);
    let simple_name = &class_name[simple_start..];
    let outer_name = match simple_name.find('$') {
        Some(index) if simple_start + index > 0 => &simple_name[..index],
        _ => simple_name,
    };
    format!("{}.java", outer_name)
}
