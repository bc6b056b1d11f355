//! Integration tests for the trace command.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixture, isolated_config, path_str, run_retrace};

const RETRACED: &str = "\
java.lang.IllegalStateException: boom
\tat com.example.Main.helper(Main.java:20)
\tat com.example.Main.main(Main.java:11)
";

// ============================================================================
// Input and output
// ============================================================================

#[test]
fn trace_file_to_stdout() {
    let temp = TempDir::new().unwrap();
    let config = isolated_config(&temp);
    let (stdout, stderr, code) = run_retrace(&[
        "trace",
        &fixture("mapping.txt"),
        &fixture("crash.txt"),
        "--config",
        &config,
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, RETRACED);
}

#[test]
fn trace_reads_stdin() {
    let temp = TempDir::new().unwrap();
    Command::cargo_bin("retrace")
        .unwrap()
        .args(["trace", &fixture("mapping.txt"), "--config", &isolated_config(&temp)])
        .write_stdin("java.lang.Error\n\tat a.b(SourceFile:5)")
        .assert()
        .success()
        .stdout("java.lang.Error\n\tat com.example.Main.helper(Main.java:20)\n");
}

#[test]
fn trace_dash_reads_stdin() {
    let temp = TempDir::new().unwrap();
    Command::cargo_bin("retrace")
        .unwrap()
        .args(["trace", &fixture("mapping.txt"), "-", "--config", &isolated_config(&temp)])
        .write_stdin("Caused by: b: gone")
        .assert()
        .success()
        .stdout("Caused by: com.example.Widget: gone\n");
}

#[test]
fn trace_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.txt");
    let (stdout, _, code) = run_retrace(&[
        "trace",
        &fixture("mapping.txt"),
        &fixture("crash.txt"),
        "-o",
        &path_str(&output),
        "--config",
        &isolated_config(&temp),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), RETRACED);
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn trace_verbose_flag() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, code) = run_retrace(&[
        "trace",
        &fixture("mapping.txt"),
        &fixture("crash.txt"),
        "--verbose",
        "--config",
        &isolated_config(&temp),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\tat com.example.Main.void helper()(Main.java:20)"));
}

#[test]
fn trace_uses_configured_options() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "[retrace]\nall_class_names = true\n").unwrap();

    Command::cargo_bin("retrace")
        .unwrap()
        .args(["trace", &fixture("mapping.txt"), "--config", &path_str(&config)])
        .write_stdin("Object a is not b")
        .assert()
        .success()
        .stdout("Object com.example.Main is not com.example.Widget\n");
}

#[test]
fn trace_custom_template() {
    let temp = TempDir::new().unwrap();
    let mapping = temp.path().join("mapping.txt");
    fs::write(&mapping, "com.example.Task -> a:\n    void run() -> b\n").unwrap();

    Command::cargo_bin("retrace")
        .unwrap()
        .args([
            "trace",
            &path_str(&mapping),
            "--regex",
            r"%c\.%m",
            "--config",
            &isolated_config(&temp),
        ])
        .write_stdin("a.b")
        .assert()
        .success()
        .stdout("com.example.Task.run\n");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn trace_invalid_template_fails() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run_retrace(&[
        "trace",
        &fixture("mapping.txt"),
        &fixture("crash.txt"),
        "--regex",
        "%c(",
        "--config",
        &isolated_config(&temp),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid retrace options"));
}

#[test]
fn trace_missing_mapping_fails() {
    let temp = TempDir::new().unwrap();
    Command::cargo_bin("retrace")
        .unwrap()
        .args([
            "trace",
            "/nonexistent/mapping.txt",
            &fixture("crash.txt"),
            "--config",
            &isolated_config(&temp),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read mapping file"));
}

#[test]
fn trace_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "[batch]\nworkers = 0\n").unwrap();

    let (_, stderr, code) = run_retrace(&[
        "trace",
        &fixture("mapping.txt"),
        &fixture("crash.txt"),
        "--config",
        &path_str(&config),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to parse config file"));
}
