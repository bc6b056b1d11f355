//! Integration tests for the batch command.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::helpers::{fixture, fixtures_dir, isolated_config, path_str, run_retrace};

const RETRACED: &str = "\
java.lang.IllegalStateException: boom
\tat com.example.Main.helper(Main.java:20)
\tat com.example.Main.main(Main.java:11)
";

/// Copy the sample crash into `dir` under each name.
fn copy_crashes(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    let crash = fs::read_to_string(fixtures_dir().join("crash.txt")).unwrap();
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, &crash).unwrap();
            path
        })
        .collect()
}

#[test]
fn batch_writes_outputs_next_to_inputs() {
    let temp = TempDir::new().unwrap();
    let inputs = copy_crashes(&temp, &["one.txt", "two.txt", "three.txt"]);

    let mut args = vec![
        "batch".to_string(),
        fixture("mapping.txt"),
        "--jobs".to_string(),
        "2".to_string(),
        "--config".to_string(),
        isolated_config(&temp),
    ];
    args.extend(inputs.iter().map(|path| path_str(path)));
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let (stdout, stderr, code) = run_retrace(&args);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Retraced 3 file(s)"));
    assert!(stdout.contains("using 2 worker(s)"));

    for name in ["one.txt", "two.txt", "three.txt"] {
        let output = temp.path().join(format!("{}.retraced", name));
        assert_eq!(fs::read_to_string(&output).unwrap(), RETRACED);
        assert!(stdout.contains(&path_str(&output)));
    }
}

#[test]
fn batch_out_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let inputs = copy_crashes(&temp, &["crash.txt"]);
    let out_dir = temp.path().join("nested").join("out");

    let (_, stderr, code) = run_retrace(&[
        "batch",
        &fixture("mapping.txt"),
        &path_str(&inputs[0]),
        "--out-dir",
        &path_str(&out_dir),
        "--config",
        &isolated_config(&temp),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        fs::read_to_string(out_dir.join("crash.txt.retraced")).unwrap(),
        RETRACED
    );
}

#[test]
fn batch_uses_configured_suffix_and_workers() {
    let temp = TempDir::new().unwrap();
    let inputs = copy_crashes(&temp, &["a.txt", "b.txt"]);
    let config = temp.path().join("config.toml");
    fs::write(&config, "[batch]\nworkers = 3\noutput_suffix = \".out\"\n").unwrap();

    let (stdout, stderr, code) = run_retrace(&[
        "batch",
        &fixture("mapping.txt"),
        &path_str(&inputs[0]),
        &path_str(&inputs[1]),
        "--config",
        &path_str(&config),
    ]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("using 3 worker(s)"));
    assert!(temp.path().join("a.txt.out").exists());
    assert!(temp.path().join("b.txt.out").exists());
}

#[test]
fn batch_zero_jobs_fails() {
    let temp = TempDir::new().unwrap();
    let inputs = copy_crashes(&temp, &["a.txt"]);

    let (_, stderr, code) = run_retrace(&[
        "batch",
        &fixture("mapping.txt"),
        &path_str(&inputs[0]),
        "-j",
        "0",
        "--config",
        &isolated_config(&temp),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--jobs must be > 0"));
}

#[test]
fn batch_missing_input_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let inputs = copy_crashes(&temp, &["a.txt"]);
    let missing = temp.path().join("missing.txt");

    let (_, stderr, code) = run_retrace(&[
        "batch",
        &fixture("mapping.txt"),
        &path_str(&inputs[0]),
        &path_str(&missing),
        "--config",
        &isolated_config(&temp),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to read stack trace"));
    assert!(!temp.path().join("a.txt.retraced").exists());
}
