//! Download configuration.
//!
//! Everything the orchestrator needs to know about the local side of a run:
//! where downloads go, what the default subfolder is called, which explicit
//! destination value means "unset", and where the ambient credential lives.

use std::path::{Path, PathBuf};

use crate::paths::{PathError, resolve_download_root};
use crate::ports::DEFAULT_TOKEN_ENV_VAR;

/// Subfolder used when neither an override nor a category applies.
pub const DEFAULT_SUBFOLDER: &str = "IF_AI";

/// Explicit destination value that means "no override".
pub const DESTINATION_PLACEHOLDER: &str = "/path/to/download/folder";

/// Configuration for download runs.
///
/// # Example
///
/// ```
/// use modelfetch_core::FetchConfig;
///
/// let config = FetchConfig::new("/data/models").with_default_subfolder("misc");
/// assert_eq!(config.default_subfolder(), "misc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    download_root: PathBuf,
    default_subfolder: String,
    placeholder: String,
    token_env_var: String,
}

impl FetchConfig {
    /// Create a configuration rooted at `download_root`.
    pub fn new(download_root: impl Into<PathBuf>) -> Self {
        Self {
            download_root: download_root.into(),
            default_subfolder: DEFAULT_SUBFOLDER.to_string(),
            placeholder: DESTINATION_PLACEHOLDER.to_string(),
            token_env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
        }
    }

    /// Create a configuration whose root comes from [`resolve_download_root`].
    pub fn from_env(explicit_root: Option<&str>) -> Result<Self, PathError> {
        Ok(Self::new(resolve_download_root(explicit_root)?.path))
    }

    /// Set the default subfolder. Defaults to `IF_AI`.
    #[must_use]
    pub fn with_default_subfolder(mut self, name: impl Into<String>) -> Self {
        self.default_subfolder = name.into();
        self
    }

    /// Set the placeholder destination value.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the credential environment variable. Defaults to `HF_TOKEN`.
    #[must_use]
    pub fn with_token_env_var(mut self, var: impl Into<String>) -> Self {
        self.token_env_var = var.into();
        self
    }

    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    pub fn default_subfolder(&self) -> &str {
        &self.default_subfolder
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn token_env_var(&self) -> &str {
        &self.token_env_var
    }
}
