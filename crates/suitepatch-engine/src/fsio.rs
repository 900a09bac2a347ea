//! Filesystem primitives: atomic text replacement with path-carrying errors.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Filesystem failures; fatal for the whole plan application.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}

impl FsError {
    pub(crate) fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Read a document as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, FsError> {
    fs::read_to_string(path).map_err(|e| FsError::io(path, e.to_string()))
}

/// Replace `path` with `text` atomically: write a temp sibling, fsync,
/// rename into place, then sync the parent directory. Parent directories
/// are created as needed.
pub fn write_text_atomic(path: &Path, text: &str) -> Result<(), FsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e.to_string()))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), FsError> {
        let mut file =
            File::create(&tmp_path).map_err(|e| FsError::io(&tmp_path, e.to_string()))?;
        file.write_all(text.as_bytes())
            .map_err(|e| FsError::io(&tmp_path, e.to_string()))?;
        file.sync_all()
            .map_err(|e| FsError::io(&tmp_path, e.to_string()))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FsError::io(
            path,
            format!("{} -> {}: {e}", tmp_path.display(), path.display()),
        )
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent).map_err(|e| FsError::io(parent, e.to_string()))?;
        dir.sync_all().map_err(|e| FsError::io(parent, e.to_string()))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{unique}", std::process::id()));
    PathBuf::from(tmp)
}
