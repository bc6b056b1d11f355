//! Unit tests for config module

use std::fs;

use retrace::config::MAX_WORKERS;
use retrace::Config;
use tempfile::TempDir;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert!(!config.retrace.verbose);
    assert!(!config.retrace.all_class_names);
    assert!(config.retrace.regular_expression.is_none());
    assert!(config.retrace.regular_expression2.is_none());
    assert_eq!(config.batch.workers, 4);
    assert_eq!(config.batch.output_suffix, ".retraced");
}

#[test]
fn full_config_parses_from_toml() {
    let config = Config::parse(
        r#"
[retrace]
verbose = true
all_class_names = true
regular_expression = "at %c\\.%m"

[batch]
workers = 8
output_suffix = ".out"
"#,
    )
    .unwrap();
    assert!(config.retrace.verbose);
    assert!(config.retrace.all_class_names);
    assert_eq!(config.retrace.regular_expression.as_deref(), Some(r"at %c\.%m"));
    assert!(config.retrace.regular_expression2.is_none());
    assert_eq!(config.batch.workers, 8);
    assert_eq!(config.batch.output_suffix, ".out");
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = Config::parse("[batch]\nworkers = 2\n").unwrap();
    assert_eq!(config.batch.workers, 2);
    assert_eq!(config.batch.output_suffix, ".retraced");
    assert!(!config.retrace.verbose);
}

#[test]
fn config_serialization_roundtrip() {
    let mut config = Config::default();
    config.retrace.verbose = true;
    config.retrace.regular_expression2 = Some("%c".to_string());
    config.batch.workers = 16;

    let parsed = Config::parse(&config.to_toml().unwrap()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn invalid_values_are_rejected() {
    let err = Config::parse("[batch]\nworkers = 0\n").unwrap_err();
    assert!(err.to_string().contains("batch.workers must be > 0"));

    let too_many = format!("[batch]\nworkers = {}\n", MAX_WORKERS + 1);
    assert!(Config::parse(&too_many).is_err());

    let err = Config::parse("[batch]\noutput_suffix = \"out/x\"\n").unwrap_err();
    assert!(err.to_string().contains("path separators"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(Config::parse("[batch\nworkers = 2").is_err());
    assert!(Config::parse("[batch]\nworkers = \"four\"\n").is_err());
}

#[test]
fn load_from_missing_file_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn load_from_reads_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[retrace]\nall_class_names = true\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.retrace.all_class_names);
}

#[test]
fn load_from_invalid_file_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[batch]\nworkers = 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.toml"));
}

#[test]
fn config_path_is_under_config_dir() {
    let path = Config::config_path().unwrap();
    assert!(path.ends_with(".config/retrace/config.toml"));
    assert_eq!(path.parent().unwrap(), Config::config_dir().unwrap());
}

#[test]
fn retrace_options_apply_overrides() {
    let config = Config::parse("[retrace]\nregular_expression = \"%c\"\n").unwrap();

    let options = config.retrace_options(true, false, None, Some("%m"));
    assert!(options.verbose);
    assert_eq!(options.regular_expression.as_deref(), Some("%c"));
    assert_eq!(options.regular_expression2.as_deref(), Some("%m"));

    let options = config.retrace_options(false, false, Some("%a"), None);
    assert_eq!(options.regular_expression.as_deref(), Some("%a"));
}
