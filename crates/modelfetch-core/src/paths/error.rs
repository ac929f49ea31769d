//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::download::FetchError;

/// Errors that can occur during path resolution and directory creation.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),

    /// An identifier does not yield a usable folder name.
    #[error("model identifier '{0}' does not name a folder")]
    InvalidFolderName(String),
}

impl From<PathError> for FetchError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::CreateFailed { .. } | PathError::NotADirectory(_) => Self::Io {
                kind: "CreateDir".to_string(),
                message: err.to_string(),
            },
            PathError::InvalidFolderName(_) => Self::invalid_request(err.to_string()),
            other => Self::unexpected(other.to_string()),
        }
    }
}
