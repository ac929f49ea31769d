//! Exclusion filtering.
//!
//! Exclusions are exact `/`-separated paths relative to the destination root.
//! No glob matching.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// A file that matched the exclusion list but could not be removed.
#[derive(Debug, Error)]
#[error("failed to remove excluded file {}: {source}", .path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Whether `relative` is in the exclusion list.
pub fn is_excluded(relative: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|item| item == relative)
}

/// `path` relative to `root`, with `/` separators on every platform.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Delete every file under `root` whose relative path is excluded.
///
/// Returns one entry per matching file: `Ok(path)` when removed,
/// `Err(CleanupError)` when removal failed. Unreadable directory entries are
/// skipped.
pub fn remove_excluded(root: &Path, exclude: &[String]) -> Vec<Result<PathBuf, CleanupError>> {
    remove_excluded_with(root, exclude, |path| fs::remove_file(path))
}

/// [`remove_excluded`] with a caller-supplied removal function.
pub fn remove_excluded_with<F>(
    root: &Path,
    exclude: &[String],
    mut remove: F,
) -> Vec<Result<PathBuf, CleanupError>>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    if exclude.is_empty() {
        return Vec::new();
    }

    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry during exclusion cleanup");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            relative_key(root, entry.path()).is_some_and(|key| is_excluded(&key, exclude))
        })
        .map(|entry| {
            let path = entry.into_path();
            remove(&path)
                .map(|()| path.clone())
                .map_err(|source| CleanupError { path, source })
        })
        .collect()
}
