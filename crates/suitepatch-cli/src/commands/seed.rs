use std::path::Path;

use suitepatch_engine::{ApplyMode, GeneratedSuite, SeedReport, write_suite};

use crate::support::{exit_with_error, print_json_or_exit, read_to_string_or_exit};

pub fn run(suite_path: String, dir: String, commit: bool, json: bool) {
    let text = read_to_string_or_exit(&suite_path, "generated suite");
    let suite: GeneratedSuite =
        serde_json::from_str(&text).unwrap_or_else(|e| exit_with_error(e));

    let mode = if commit {
        ApplyMode::Commit
    } else {
        ApplyMode::Simulate
    };
    let report = write_suite(Path::new(&dir), &suite, mode).unwrap_or_else(|e| exit_with_error(e));

    if json {
        print_json_or_exit(&report);
        return;
    }
    print_report(&dir, &report);
}

fn print_report(dir: &str, report: &SeedReport) {
    println!("suitepatch seed ({}) in {dir}", report.mode.as_str());
    println!();
    println!("  documents: {}", report.files.len());
    for path in report.files.keys() {
        println!("    - {path}");
    }
    if report.mode == ApplyMode::Commit {
        println!("  written: {}", report.written.len());
        if !report.backups.is_empty() {
            println!("  backups: {}", report.backups.len());
        }
    }
}
