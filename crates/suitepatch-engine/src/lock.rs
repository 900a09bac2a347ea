//! Single-writer lock per base directory.
//!
//! Two simultaneous commits against the same base directory could race and
//! silently overwrite each other's backups or content, so the mutate-and-
//! commit phase holds this lock. Simulate-mode reads are side-effect-free
//! and take no lock.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".suitepatch.lock";

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("base directory lock busy: {lock_path}")]
    Busy { lock_path: String },

    #[error("failed to acquire base directory lock {lock_path}: {message}")]
    Io { lock_path: String, message: String },
}

/// Held for the duration of one commit; the lock file is removed on drop.
#[derive(Debug)]
pub struct DirLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl DirLockGuard {
    /// Lock file location for a base directory.
    pub fn lock_path(base_dir: &Path) -> PathBuf {
        base_dir.join(LOCK_FILE_NAME)
    }

    /// Take exclusive write ownership of `base_dir`, creating it if needed.
    pub fn acquire(base_dir: &Path) -> Result<Self, LockError> {
        let lock_path = Self::lock_path(base_dir);
        fs::create_dir_all(base_dir).map_err(|e| LockError::Io {
            lock_path: lock_path.display().to_string(),
            message: e.to_string(),
        })?;

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                let _ = writeln!(
                    file,
                    "pid={}\nutc={}",
                    std::process::id(),
                    Utc::now().to_rfc3339()
                );
                Ok(Self {
                    lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Err(LockError::Busy {
                lock_path: lock_path.display().to_string(),
            }),
            Err(err) => Err(LockError::Io {
                lock_path: lock_path.display().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

impl Drop for DirLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
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
        std::env::temp_dir().join(format!(
            "suitepatch-lock-{prefix}-{}-{unique}",
            std::process::id()
        ))
    }

    #[test]
    fn acquire_writes_lock_file_and_drop_removes_it() {
        let dir = temp_dir("drop");
        let lock_path = DirLockGuard::lock_path(&dir);

        {
            let _guard = DirLockGuard::acquire(&dir).expect("lock should acquire");
            assert!(lock_path.exists());
        }
        assert!(!lock_path.exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn second_acquire_reports_busy() {
        let dir = temp_dir("busy");
        let _guard = DirLockGuard::acquire(&dir).expect("first acquire should succeed");

        match DirLockGuard::acquire(&dir) {
            Err(LockError::Busy { .. }) => {}
            other => panic!("expected busy lock, got {other:?}"),
        }

        drop(_guard);
        let _ = fs::remove_dir_all(dir);
    }
}
