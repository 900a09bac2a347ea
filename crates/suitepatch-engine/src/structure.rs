//! Parsed structural listing of every document under a base directory.
//!
//! This is the read-only surface an upstream producer consumes to see the
//! current suite before proposing changes.

use serde::Serialize;
use std::path::Path;

use suitepatch_model::Scenario;

use crate::fsio::FsError;
use crate::loader::load_documents;

/// Serializable summary of one feature document.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub screen: String,
    pub feature: String,
    pub file: String,
    pub scenarios: Vec<Scenario>,
}

/// Parse every document under `base_dir` into an ordered listing.
///
/// Files without a `Feature:` header are omitted; a missing base directory
/// yields an empty listing.
pub fn suite_structure(base_dir: &Path) -> Result<Vec<FeatureSummary>, FsError> {
    let documents = load_documents(base_dir)?;
    Ok(documents
        .into_iter()
        .map(|loaded| FeatureSummary {
            screen: loaded.screen,
            feature: loaded.document.feature,
            file: loaded.file_name,
            scenarios: loaded.document.scenarios,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "suitepatch-structure-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should exist");
        path
    }

    #[test]
    fn listing_reports_scenarios_and_steps() {
        let base = temp_dir("list");
        let screen = base.join("login");
        fs::create_dir_all(&screen).expect("screen dir should exist");
        fs::write(
            screen.join("reset.feature"),
            "Feature: Password Reset\n\n  Scenario: Happy path\n    Given a user\n    When they reset\n\n",
        )
        .expect("fixture");

        let listing = suite_structure(&base).expect("structure should succeed");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].feature, "Password Reset");
        assert_eq!(listing[0].file, "reset.feature");
        assert_eq!(listing[0].scenarios[0].steps.len(), 2);

        let value = serde_json::to_value(&listing).expect("listing should serialize");
        assert_eq!(value[0]["scenarios"][0]["steps"][0], "Given a user");

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn missing_base_yields_empty_listing() {
        let base = temp_dir("empty").join("absent");
        let listing = suite_structure(&base).expect("missing base should not error");
        assert!(listing.is_empty());
    }
}
