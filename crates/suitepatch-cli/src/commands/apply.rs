use suitepatch_engine::{ApplyMode, ApplyReport, PatchEngine, UpdatePlan};

use crate::support::{exit_with_error, print_json_or_exit, read_to_string_or_exit};

pub fn run(plan_path: String, dir: String, commit: bool, json: bool) {
    let text = read_to_string_or_exit(&plan_path, "update plan");
    let plan = UpdatePlan::from_json(&text).unwrap_or_else(|e| exit_with_error(e));

    let mode = if commit {
        ApplyMode::Commit
    } else {
        ApplyMode::Simulate
    };
    let engine = PatchEngine::new(&dir);
    let report = engine.apply(&plan, mode).unwrap_or_else(|e| exit_with_error(e));

    if json {
        print_json_or_exit(&report);
        return;
    }
    print_report(&dir, &report);
}

fn print_report(dir: &str, report: &ApplyReport) {
    println!("suitepatch apply ({}) in {dir}", report.mode.as_str());

    if report.diffs.is_empty() {
        println!();
        println!("  no changes");
    }
    for lines in report.diffs.values() {
        println!();
        for line in lines {
            println!("{line}");
        }
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("  skipped:");
        for diagnostic in &report.diagnostics {
            println!("    - {diagnostic}");
        }
    }

    if report.mode == ApplyMode::Commit {
        println!();
        println!("  written: {}", report.written.len());
        for path in &report.written {
            println!("    - {path}");
        }
        if !report.removed.is_empty() {
            println!("  removed: {}", report.removed.len());
            for path in &report.removed {
                println!("    - {path}");
            }
        }
        if !report.backups.is_empty() {
            println!("  backups: {}", report.backups.len());
            for path in &report.backups {
                println!("    - {path}");
            }
        }
    }
}
