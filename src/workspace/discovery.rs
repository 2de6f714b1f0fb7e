//! Upward search for the nearest directory holding the workspace marker.

use super::WORKSPACE_DIR;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Absolute form of `path`: canonical when it exists, otherwise joined onto the cwd.
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Walk from `start` (default: the current directory) toward the filesystem root and
/// return the first directory containing `.airic/`.
pub fn find_workspace_root(start: Option<&Path>) -> Option<PathBuf> {
    let start = match start {
        Some(path) => absolute_path(path),
        None => std::env::current_dir().ok()?,
    };

    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        if dir.join(WORKSPACE_DIR).is_dir() {
            debug!(root = %dir.display(), "Found workspace");
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    debug!(start = %start.display(), "No workspace found");
    None
}
