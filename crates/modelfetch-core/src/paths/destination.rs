//! Destination resolution for downloads.
//!
//! A destination is `<base>/<sanitized-folder-name>`, where the base is an
//! existing explicit override, a category folder, or the default subfolder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;
use crate::config::FetchConfig;
use crate::download::{Category, ModelIdentifier};

/// Derive a folder name from an identifier.
///
/// Takes the final `/` segment and replaces every character outside
/// `[A-Za-z0-9_.\- ]` with `_`. Distinct identifiers may map to the same
/// folder name (`a/x:y` and `b/x?y` both become `x_y`).
pub fn sanitize_folder_name(identifier: &str) -> String {
    let last = identifier.rsplit('/').next().unwrap_or(identifier);
    last.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A planned model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Directory the model folder lives in.
    pub base: PathBuf,
    /// The model folder itself.
    pub model_dir: PathBuf,
}

impl ResolvedDestination {
    /// Create the model folder (and parents). Idempotent.
    pub fn ensure_dir(&self) -> Result<(), PathError> {
        if self.model_dir.exists() {
            if !self.model_dir.is_dir() {
                return Err(PathError::NotADirectory(self.model_dir.clone()));
            }
            return Ok(());
        }
        fs::create_dir_all(&self.model_dir).map_err(|e| PathError::CreateFailed {
            path: self.model_dir.clone(),
            reason: e.to_string(),
        })
    }
}

/// Computes destination directories from a [`FetchConfig`].
#[derive(Debug, Clone)]
pub struct DestinationResolver {
    config: FetchConfig,
}

impl DestinationResolver {
    pub const fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Choose the base directory.
    ///
    /// Rules, in order:
    /// 1. `explicit` is non-empty, not the placeholder, and an existing directory
    /// 2. `category` is not [`Category::None`]: `<root>/<category>`
    /// 3. `<root>/<default subfolder>`
    ///
    /// The override is only checked, never created.
    pub fn resolve(&self, category: Category, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit.filter(|p| self.is_usable_override(p)) {
            debug!(path = %path.display(), "Using explicit destination");
            return path.to_path_buf();
        }

        let root = self.config.download_root();
        category.folder().map_or_else(
            || root.join(self.config.default_subfolder()),
            |folder| root.join(folder),
        )
    }

    /// Plan the model directory for `identifier`.
    ///
    /// Fails when the folder name is empty, `.` or `..`, since the model
    /// directory would then be the shared base folder or its parent.
    pub fn plan(
        &self,
        identifier: &ModelIdentifier,
        category: Category,
        explicit: Option<&Path>,
    ) -> Result<ResolvedDestination, PathError> {
        let folder = sanitize_folder_name(identifier.as_str());
        if matches!(folder.trim(), "" | "." | "..") {
            return Err(PathError::InvalidFolderName(identifier.to_string()));
        }
        let base = self.resolve(category, explicit);
        let model_dir = base.join(folder);
        Ok(ResolvedDestination { base, model_dir })
    }

    fn is_usable_override(&self, path: &Path) -> bool {
        let raw = path.as_os_str();
        !raw.is_empty() && raw != self.config.placeholder() && path.is_dir()
    }
}
