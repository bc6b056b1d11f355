//! Unit tests for stack trace retracing

use ::retrace::{retrace, retrace_with, RetraceError, RetraceOptions, Retracer};

use crate::helpers::{load_fixture, sample_mapping};

const RETRACED: &str = "\
java.lang.IllegalStateException: boom
\tat com.example.Main.helper(Main.java:20)
\tat com.example.Main.main(Main.java:11)
";

#[test]
fn retraces_sample_crash() {
    let output = retrace(&load_fixture("crash.txt"), &sample_mapping());
    assert_eq!(output, RETRACED);
}

#[test]
fn verbose_output_includes_signatures() {
    let options = RetraceOptions {
        verbose: true,
        ..RetraceOptions::default()
    };
    let output = retrace_with(&load_fixture("crash.txt"), &sample_mapping(), &options).unwrap();
    assert_eq!(
        output,
        "\
java.lang.IllegalStateException: boom
\tat com.example.Main.void helper()(Main.java:20)
\tat com.example.Main.void main(java.lang.String[])(Main.java:11)
"
    );
}

#[test]
fn empty_mapping_leaves_trace_unchanged() {
    let trace = load_fixture("crash.txt");
    assert_eq!(retrace(&trace, ""), trace);
}

#[test]
fn empty_trace_stays_empty() {
    assert_eq!(retrace("", &sample_mapping()), "");
}

#[test]
fn retracer_is_reusable_across_mappings() {
    let retracer = Retracer::default();
    let trace = "java.lang.RuntimeException\n\tat a.run(Unknown Source)";
    assert_eq!(
        retracer.retrace(trace, "com.First -> a:\n    void start() -> run\n"),
        "java.lang.RuntimeException\n\tat com.First.start(Unknown Source)"
    );
    assert_eq!(
        retracer.retrace(trace, "com.Second -> a:\n    void stop() -> run\n"),
        "java.lang.RuntimeException\n\tat com.Second.stop(Unknown Source)"
    );
}

#[test]
fn retracer_can_be_shared_between_threads() {
    let retracer = Retracer::default();
    let mapping = sample_mapping();
    let trace = load_fixture("crash.txt");

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| retracer.retrace(&trace, &mapping)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(outputs.iter().all(|output| output == RETRACED));
}

#[test]
fn invalid_primary_template_is_rejected() {
    let options = RetraceOptions {
        regular_expression: Some("at %c.%m(".to_string()),
        ..RetraceOptions::default()
    };
    let err = Retracer::new(&options).unwrap_err();
    assert!(matches!(err, RetraceError::InvalidTemplate { .. }));
    assert!(err.to_string().contains("at %c.%m("));
}
