//! Snapshot-before-mutate history for feature documents.
//!
//! Each screen directory owns a `_history` sibling holding timestamped
//! copies of files taken immediately before they are overwritten or
//! deleted. Snapshots are append-only; retention is an external concern.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, sibling to the feature files within each screen folder,
/// holding timestamped backups. Never shared across screens.
pub const HISTORY_DIR: &str = "_history";

/// Filename timestamp: sortable UTC with second resolution.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("failed to back up {path}: {message}")]
    Io { path: String, message: String },
}

impl BackupError {
    fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Copy `path` into its sibling `_history` directory, stamped with the
/// current UTC time.
///
/// Returns the backup path, or `None` when the source does not exist:
/// backing up a missing file is a silent no-op, never an error, so the
/// calling mutation proceeds either way.
pub fn snapshot_file(path: &Path) -> Result<Option<PathBuf>, BackupError> {
    snapshot_file_at(path, Utc::now())
}

/// `snapshot_file` with an explicit timestamp.
pub fn snapshot_file_at(path: &Path, now: DateTime<Utc>) -> Result<Option<PathBuf>, BackupError> {
    if !path.exists() {
        return Ok(None);
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let history_dir = parent.join(HISTORY_DIR);
    fs::create_dir_all(&history_dir).map_err(|e| BackupError::io(&history_dir, e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = now.format(TIMESTAMP_FORMAT);

    // Snapshots are append-only: a second mutation within the same second
    // must not clobber the first copy, so collisions get a counter suffix.
    let mut backup_path = history_dir.join(format!("{file_name}.{stamp}.bak"));
    let mut attempt = 1u32;
    while backup_path.exists() {
        attempt += 1;
        backup_path = history_dir.join(format!("{file_name}.{stamp}.{attempt}.bak"));
    }

    fs::copy(path, &backup_path).map_err(|e| BackupError::io(path, e.to_string()))?;
    Ok(Some(backup_path))
}
