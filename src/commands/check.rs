//! Check command handler

use anyhow::Result;
use std::path::PathBuf;

use retrace::Fixture;

/// Run every fixture and print a line per fixture plus a summary.
///
/// Returns whether all fixtures passed.
pub fn handle(fixtures: &[PathBuf], verbose: bool) -> Result<bool> {
    let mut passed = 0;
    let mut failed = 0;

    for path in fixtures {
        let fixture = Fixture::load(path)?;
        let outcome = fixture.check(verbose);

        if outcome.passed() {
            println!("✓ {}", outcome.name);
            passed += 1;
        } else {
            println!("✗ {} ({})", outcome.name, path.display());
            println!("  expected:");
            for line in outcome.expected.lines() {
                println!("    {}", line);
            }
            println!("  actual:");
            for line in outcome.actual.lines() {
                println!("    {}", line);
            }
            failed += 1;
        }
    }

    println!();
    println!("{} passed, {} failed", passed, failed);

    Ok(failed == 0)
}
