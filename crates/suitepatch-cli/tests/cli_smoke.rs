//! End-to-end smoke tests for the `suitepatch` binary.

use serde_json::Value;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "suitepatch-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_suitepatch<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_suitepatch");
    Command::new(bin)
        .args(args)
        .output()
        .expect("suitepatch command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_sample_suite(base: &Path) {
    let screen = base.join("login");
    fs::create_dir_all(&screen).expect("screen dir should exist");
    fs::write(
        screen.join("password_reset.feature"),
        "Feature: Password Reset\n\n  Scenario: Happy path\n    Given A\n    When B\n    Then C\n",
    )
    .expect("sample document should be written");
}

fn write_sample_plan(dir: &Path) -> PathBuf {
    let plan_path = dir.join("plan.json");
    fs::write(
        &plan_path,
        r#"{"changes": [{"action": "update_step", "screen": "login",
            "feature": "password_reset", "scenario": "Happy path",
            "step_index": 1, "old_value": "When B", "new_value": "When B2"}]}"#,
    )
    .expect("sample plan should be written");
    plan_path
}

#[test]
fn apply_simulates_by_default_and_prints_a_diff() {
    let dir = TempDirGuard::new("simulate");
    let base = dir.path().join("features");
    write_sample_suite(&base);
    let plan_path = write_sample_plan(dir.path());

    let output = run_suitepatch([
        OsString::from("apply"),
        plan_path.as_os_str().to_os_string(),
        OsString::from("--dir"),
        base.as_os_str().to_os_string(),
    ]);
    assert_success(&output);

    let text = stdout_text(&output);
    assert!(text.contains("-    When B"), "stdout:\n{text}");
    assert!(text.contains("+    When B2"), "stdout:\n{text}");

    // Simulation must not have touched the document.
    let on_disk = fs::read_to_string(base.join("login/password_reset.feature"))
        .expect("document should still exist");
    assert!(on_disk.contains("When B\n"));
    assert!(!on_disk.contains("When B2"));
}

#[test]
fn apply_commit_persists_and_reports_json() {
    let dir = TempDirGuard::new("commit");
    let base = dir.path().join("features");
    write_sample_suite(&base);
    let plan_path = write_sample_plan(dir.path());

    let output = run_suitepatch([
        OsString::from("apply"),
        plan_path.as_os_str().to_os_string(),
        OsString::from("--dir"),
        base.as_os_str().to_os_string(),
        OsString::from("--commit"),
        OsString::from("--json"),
    ]);
    assert_success(&output);

    let report = parse_json_stdout(&output);
    assert_eq!(report["mode"], "commit");
    assert_eq!(report["written"][0], "login/password_reset.feature");
    assert_eq!(report["backups"].as_array().map(Vec::len), Some(1));

    let on_disk = fs::read_to_string(base.join("login/password_reset.feature"))
        .expect("document should exist");
    assert!(on_disk.contains("When B2"));
    assert!(base.join("login/_history").exists());
}

#[test]
fn apply_rejects_a_malformed_plan() {
    let dir = TempDirGuard::new("malformed");
    let base = dir.path().join("features");
    write_sample_suite(&base);
    let plan_path = dir.path().join("plan.json");
    fs::write(
        &plan_path,
        r#"{"changes": [{"action": "rename_feature", "screen": "login", "feature": "x"}]}"#,
    )
    .expect("plan should be written");

    let output = run_suitepatch([
        OsString::from("apply"),
        plan_path.as_os_str().to_os_string(),
        OsString::from("--dir"),
        base.as_os_str().to_os_string(),
    ]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed update plan"), "stderr:\n{stderr}");
}

#[test]
fn structure_lists_the_suite_as_json() {
    let dir = TempDirGuard::new("structure");
    let base = dir.path().join("features");
    write_sample_suite(&base);

    let output = run_suitepatch([
        OsString::from("structure"),
        OsString::from("--dir"),
        base.as_os_str().to_os_string(),
        OsString::from("--json"),
    ]);
    assert_success(&output);

    let listing = parse_json_stdout(&output);
    assert_eq!(listing[0]["screen"], "login");
    assert_eq!(listing[0]["feature"], "Password Reset");
    assert_eq!(listing[0]["scenarios"][0]["steps"][1], "When B");
}

#[test]
fn seed_commit_materializes_a_generated_suite() {
    let dir = TempDirGuard::new("seed");
    let base = dir.path().join("features");
    let suite_path = dir.path().join("suite.json");
    fs::write(
        &suite_path,
        r#"{"features": [{"screen": "Checkout", "feature": "Coupons",
            "description": "Discount codes at checkout.",
            "scenarios": [{"name": "Apply a coupon",
                "steps": ["Given a valid coupon", "When it is applied", "Then the total drops"]}]}]}"#,
    )
    .expect("suite should be written");

    let output = run_suitepatch([
        OsString::from("seed"),
        suite_path.as_os_str().to_os_string(),
        OsString::from("--dir"),
        base.as_os_str().to_os_string(),
        OsString::from("--commit"),
        OsString::from("--json"),
    ]);
    assert_success(&output);

    let report = parse_json_stdout(&output);
    assert_eq!(report["written"][0], "checkout/coupons.feature");

    let on_disk = fs::read_to_string(base.join("checkout/coupons.feature"))
        .expect("seeded document should exist");
    assert!(on_disk.starts_with("Feature: Coupons\n"));
    assert!(on_disk.contains("    Then the total drops\n"));
}
