//! Fresh per-application loading of the on-disk document tree.

use std::fs;
use std::path::{Path, PathBuf};

use suitepatch_model::{FEATURE_EXTENSION, FeatureDocument};

use crate::backup::HISTORY_DIR;
use crate::fsio::{FsError, read_text};

/// One parsed document plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub screen: String,
    pub file_name: String,
    pub path: PathBuf,
    pub text: String,
    pub document: FeatureDocument,
}

/// Load every parseable feature document under `base_dir`.
///
/// Layout is one level deep: `base_dir/<screen>/<feature>.feature`.
/// `_history` directories are never read, and a file without a `Feature:`
/// header is treated as not present. A missing base directory yields an
/// empty suite. Order is deterministic (path-sorted).
pub fn load_documents(base_dir: &Path) -> Result<Vec<LoadedDocument>, FsError> {
    let mut documents = Vec::new();
    if !base_dir.exists() {
        return Ok(documents);
    }

    for screen_path in sorted_entries(base_dir)? {
        if !screen_path.is_dir() {
            continue;
        }
        let Some(screen) = file_name_string(&screen_path) else {
            continue;
        };
        if screen == HISTORY_DIR {
            continue;
        }

        for file_path in sorted_entries(&screen_path)? {
            if !file_path.is_file() {
                continue;
            }
            if file_path.extension().and_then(|ext| ext.to_str()) != Some(FEATURE_EXTENSION) {
                continue;
            }
            let Some(file_name) = file_name_string(&file_path) else {
                continue;
            };

            let text = read_text(&file_path)?;
            let Some(document) = FeatureDocument::parse(&text) else {
                continue;
            };

            documents.push(LoadedDocument {
                screen: screen.clone(),
                file_name,
                path: file_path,
                text,
                document,
            });
        }
    }

    Ok(documents)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    let read = fs::read_dir(dir).map_err(|e| FsError::io(dir, e.to_string()))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| FsError::io(dir, e.to_string()))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn file_name_string(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "suitepatch-loader-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should exist");
        path
    }

    #[test]
    fn loads_feature_files_and_skips_history_and_noise() {
        let base = temp_dir("load");
        let screen = base.join("login");
        fs::create_dir_all(screen.join(HISTORY_DIR)).expect("history dir should exist");
        fs::write(screen.join("reset.feature"), "Feature: Reset\n\n").expect("fixture");
        fs::write(screen.join("notes.txt"), "not a document").expect("fixture");
        fs::write(screen.join("headerless.feature"), "Scenario: Orphan\n").expect("fixture");
        fs::write(
            screen.join(HISTORY_DIR).join("reset.feature.20240101_000000.bak"),
            "Feature: Old\n\n",
        )
        .expect("fixture");

        let documents = load_documents(&base).expect("load should succeed");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].screen, "login");
        assert_eq!(documents[0].file_name, "reset.feature");
        assert_eq!(documents[0].document.feature, "Reset");

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn missing_base_directory_yields_empty_suite() {
        let base = temp_dir("missing").join("nowhere");
        let documents = load_documents(&base).expect("missing base should not error");
        assert!(documents.is_empty());
    }
}
