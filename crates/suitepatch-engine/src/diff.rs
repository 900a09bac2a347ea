//! Unified diffs between pre- and post-state document text.

use similar::TextDiff;
use std::collections::{BTreeMap, BTreeSet};

/// Unified diff lines for one file; empty when the contents match.
pub fn unified_diff_lines(old: &str, new: &str, label: &str) -> Vec<String> {
    if old == new {
        return Vec::new();
    }

    let diff = TextDiff::from_lines(old, new);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string();
    unified.lines().map(ToOwned::to_owned).collect()
}

/// Per-file diffs keyed by base-relative path; unchanged files are omitted.
///
/// A path present on only one side diffs against empty content, so created
/// and deleted files show up as pure additions or removals.
pub fn diff_report(
    pre: &BTreeMap<String, String>,
    post: &BTreeMap<String, String>,
) -> BTreeMap<String, Vec<String>> {
    let mut paths: BTreeSet<&String> = pre.keys().collect();
    paths.extend(post.keys());

    let mut report = BTreeMap::new();
    for path in paths {
        let old = pre.get(path).map(String::as_str).unwrap_or("");
        let new = post.get(path).map(String::as_str).unwrap_or("");
        let lines = unified_diff_lines(old, new, path);
        if !lines.is_empty() {
            report.insert(path.clone(), lines);
        }
    }
    report
}
