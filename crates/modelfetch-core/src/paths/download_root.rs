//! Download root resolution.
//!
//! The download root is the directory under which category and default
//! subfolders are created.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::normalize_user_path;

/// Default relative location for downloads under the user's home directory.
pub const DEFAULT_DOWNLOAD_ROOT_RELATIVE: &str = ".local/share/modelfetch/models";

/// Environment variable overriding the download root.
pub const DOWNLOAD_ROOT_ENV_VAR: &str = "MODELFETCH_DOWNLOAD_DIR";

/// How the download root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRootSource {
    /// The user passed an explicit path (CLI flag or config).
    Explicit,
    /// The path came from `MODELFETCH_DOWNLOAD_DIR` / `.env`.
    EnvVar,
    /// Fallback default (`~/.local/share/modelfetch/models`).
    Default,
}

impl std::fmt::Display for DownloadRootSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Explicit => "explicit",
            Self::EnvVar => DOWNLOAD_ROOT_ENV_VAR,
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

/// Resolution result for the download root.
#[derive(Debug, Clone)]
pub struct DownloadRootResolution {
    /// The resolved path.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: DownloadRootSource,
}

/// Return the default download root (`~/.local/share/modelfetch/models`).
pub fn default_download_root() -> Result<PathBuf, PathError> {
    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(DEFAULT_DOWNLOAD_ROOT_RELATIVE))
}

/// Resolve the download root from an explicit override, env var, or default.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `MODELFETCH_DOWNLOAD_DIR` environment variable
/// 3. Default download root
pub fn resolve_download_root(explicit: Option<&str>) -> Result<DownloadRootResolution, PathError> {
    if let Some(path_str) = explicit.filter(|p| !p.trim().is_empty()) {
        return Ok(DownloadRootResolution {
            path: normalize_user_path(path_str)?,
            source: DownloadRootSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(DOWNLOAD_ROOT_ENV_VAR)
        && !env_path.trim().is_empty()
    {
        return Ok(DownloadRootResolution {
            path: normalize_user_path(&env_path)?,
            source: DownloadRootSource::EnvVar,
        });
    }

    Ok(DownloadRootResolution {
        path: default_download_root()?,
        source: DownloadRootSource::Default,
    })
}
