use std::path::Path;

use suitepatch_engine::suite_structure;

use crate::support::{exit_with_error, print_json_or_exit};

pub fn run(dir: String, json: bool) {
    let listing = suite_structure(Path::new(&dir)).unwrap_or_else(|e| exit_with_error(e));

    if json {
        print_json_or_exit(&listing);
        return;
    }

    if listing.is_empty() {
        println!("no feature documents under {dir}");
        return;
    }
    for summary in &listing {
        println!("{}/{}: {}", summary.screen, summary.file, summary.feature);
        for scenario in &summary.scenarios {
            println!("  Scenario: {} ({} step(s))", scenario.name, scenario.steps.len());
        }
    }
}
