//! Canonical on-disk layout: `base_dir/<screen>/<feature>.feature`.
//!
//! The mapping from `(base_dir, screen, feature)` to a path is the only
//! source of document identity. It must be exercised identically whether
//! loading, matching a change target, or writing.

use std::path::{Path, PathBuf};

/// Extension carried by every feature document.
pub const FEATURE_EXTENSION: &str = "feature";

/// Normalize a screen or feature name into a filesystem component:
/// lowercase, with spaces, slashes, and dashes each becoming underscores.
pub fn normalize(name: &str) -> String {
    name.to_lowercase().replace([' ', '/', '-'], "_")
}

/// Directory holding one screen's feature documents.
pub fn screen_dir(base_dir: &Path, screen: &str) -> PathBuf {
    base_dir.join(normalize(screen))
}

/// Canonical path of the `(screen, feature)` document.
pub fn feature_path(base_dir: &Path, screen: &str, feature: &str) -> PathBuf {
    screen_dir(base_dir, screen).join(format!("{}.{FEATURE_EXTENSION}", normalize(feature)))
}

/// Express `path` relative to `base_dir`, with forward slashes, so report
/// keys are stable across absolute-path differences between runs.
pub fn relative_path(base_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let components: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    components.join("/")
}
