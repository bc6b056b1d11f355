//! Integration tests for the check command.

use std::fs;

use tempfile::TempDir;

use crate::helpers::{fixture, path_str, run_retrace};

const BROKEN_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<test name="WrongExpectation" expectedWarnings="0">
  <obfuscated><line>\tat a.b(SourceFile:1)</line></obfuscated>
  <mapping><line>com.example.Foo -&gt; a:</line></mapping>
  <retraced><line>\tat com.example.Bar.b(Bar.java:1)</line></retraced>
</test>
"#;

#[test]
fn check_bundled_fixtures_pass() {
    let (stdout, stderr, code) = run_retrace(&[
        "check",
        &fixture("ClassCastMessage.xml"),
        &fixture("LineNumbersStackTrace.xml"),
        &fixture("NullPointerReturnValue.xml"),
    ]);
    assert_eq!(code, 0, "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stdout.contains("✓ ClassCastMessage"));
    assert!(stdout.contains("✓ LineNumbersStackTrace"));
    assert!(stdout.contains("✓ NullPointerReturnValue"));
    assert!(stdout.contains("3 passed, 0 failed"));
}

#[test]
fn check_verbose_output() {
    let (stdout, _, code) = run_retrace(&[
        "check",
        &fixture("LineNumbersStackTrace.xml"),
        "--verbose-output",
    ]);
    assert_eq!(code, 0, "stdout: {}", stdout);
    assert!(stdout.contains("1 passed, 0 failed"));
}

#[test]
fn check_failing_fixture_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.xml");
    fs::write(&path, BROKEN_FIXTURE).unwrap();

    let (stdout, _, code) = run_retrace(&["check", &fixture("ClassCastMessage.xml"), &path_str(&path)]);
    assert_eq!(code, 1);
    assert!(stdout.contains("✗ WrongExpectation"));
    assert!(stdout.contains("at com.example.Bar.b(Bar.java:1)"));
    assert!(stdout.contains("at a.b(SourceFile:1)"));
    assert!(stdout.contains("1 passed, 1 failed"));
}

#[test]
fn check_invalid_fixture_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.xml");
    fs::write(&path, "<nothing/>").unwrap();

    let (_, stderr, code) = run_retrace(&["check", &path_str(&path)]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid fixture"));
}
