//! Materialize an upstream-generated suite under a base directory.
//!
//! Seeding shares the engine's dual mode: simulate returns the rendered
//! path→content map without touching storage; commit snapshots anything it
//! overwrites and persists each file atomically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use suitepatch_model::{FeatureDocument, Scenario, Step, feature_path, relative_path};

use crate::backup::snapshot_file;
use crate::engine::{ApplyMode, PatchError};
use crate::fsio::write_text_atomic;
use crate::lock::DirLockGuard;

/// A full suite produced upstream, ready to be written out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSuite {
    pub features: Vec<GeneratedFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFeature {
    pub screen: String,
    pub feature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub scenarios: Vec<GeneratedScenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedScenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl GeneratedFeature {
    /// Convert into the document model, keeping only recognizable step
    /// clauses.
    fn to_document(&self) -> FeatureDocument {
        FeatureDocument {
            feature: self.feature.clone(),
            description: self
                .description
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            scenarios: self
                .scenarios
                .iter()
                .map(|scenario| Scenario {
                    name: scenario.name.clone(),
                    steps: scenario.steps.iter().filter_map(|line| Step::parse(line)).collect(),
                })
                .collect(),
        }
    }
}

/// Outcome of seeding.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub mode: ApplyMode,
    /// Rendered document text keyed by base-relative path.
    pub files: BTreeMap<String, String>,
    /// Commit mode: base-relative paths written.
    pub written: Vec<String>,
    /// Commit mode: base-relative backup paths taken before overwrite.
    pub backups: Vec<String>,
}

/// Write a generated suite under `base_dir`.
pub fn write_suite(
    base_dir: &Path,
    suite: &GeneratedSuite,
    mode: ApplyMode,
) -> Result<SeedReport, PatchError> {
    let mut rendered: BTreeMap<PathBuf, String> = BTreeMap::new();
    for feature in &suite.features {
        let path = feature_path(base_dir, &feature.screen, &feature.feature);
        rendered.insert(path, feature.to_document().to_text());
    }

    let files: BTreeMap<String, String> = rendered
        .iter()
        .map(|(path, text)| (relative_path(base_dir, path), text.clone()))
        .collect();
    let mut report = SeedReport {
        mode,
        files,
        written: Vec::new(),
        backups: Vec::new(),
    };

    if mode == ApplyMode::Simulate {
        return Ok(report);
    }

    let _guard = DirLockGuard::acquire(base_dir)?;
    for (path, text) in &rendered {
        if let Some(backup_path) = snapshot_file(path)? {
            report.backups.push(relative_path(base_dir, &backup_path));
        }
        write_text_atomic(path, text)?;
        report.written.push(relative_path(base_dir, path));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "suitepatch-seed-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should exist");
        path
    }

    fn sample_suite() -> GeneratedSuite {
        GeneratedSuite {
            features: vec![GeneratedFeature {
                screen: "Login Screen".to_string(),
                feature: "Password Reset".to_string(),
                description: "Recovering a forgotten password.".to_string(),
                scenarios: vec![GeneratedScenario {
                    name: "Happy path".to_string(),
                    steps: vec![
                        "Given a registered user".to_string(),
                        "When they request a reset".to_string(),
                        "Then an email is sent".to_string(),
                    ],
                }],
            }],
        }
    }

    #[test]
    fn simulate_renders_without_writing() {
        let base = temp_dir("simulate");
        let report =
            write_suite(&base, &sample_suite(), ApplyMode::Simulate).expect("seed should succeed");

        let content = &report.files["login_screen/password_reset.feature"];
        assert!(content.starts_with("Feature: Password Reset\n"));
        assert!(content.contains("  Recovering a forgotten password.\n"));
        assert!(content.contains("    When they request a reset\n"));
        assert!(!base.join("login_screen").exists());

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn commit_persists_and_backs_up_overwrites() {
        let base = temp_dir("commit");
        let first =
            write_suite(&base, &sample_suite(), ApplyMode::Commit).expect("first seed commits");
        assert_eq!(first.written, vec!["login_screen/password_reset.feature"]);
        assert!(first.backups.is_empty());

        let second =
            write_suite(&base, &sample_suite(), ApplyMode::Commit).expect("second seed commits");
        assert_eq!(second.backups.len(), 1);
        assert!(second.backups[0].starts_with("login_screen/_history/password_reset.feature."));

        let on_disk = fs::read_to_string(base.join("login_screen/password_reset.feature"))
            .expect("seeded file should exist");
        assert_eq!(&on_disk, &second.files["login_screen/password_reset.feature"]);

        let _ = fs::remove_dir_all(base);
    }
}
