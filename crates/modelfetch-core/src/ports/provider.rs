//! Remote asset provider port.
//!
//! This port defines the three capabilities the orchestrator needs from a
//! remote registry. The implementation lives in `modelfetch-hub`; tests use
//! in-memory fakes.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// DTOs
// ============================================================================

/// One entry of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Item identifier (e.g. `"org/model"`).
    pub id: String,
    /// Item type as reported by the registry (`"model"`, `"dataset"`, `"space"`, ...).
    pub item_type: String,
}

impl CollectionItem {
    pub fn new(id: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
        }
    }

    /// Whether this item is a model.
    pub fn is_model(&self) -> bool {
        self.item_type == "model"
    }
}

/// A remote collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Display title.
    pub title: String,
    /// Items in registry order.
    pub items: Vec<CollectionItem>,
}

impl Collection {
    /// Identifiers of the model items, in registry order.
    pub fn model_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.is_model())
            .map(|item| item.id.clone())
            .collect()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure of a per-file transfer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessError {
    /// Exit code, `None` when the process was killed by a signal or never ran.
    pub exit_code: Option<i32>,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessError {
    pub fn new(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "command exited with code {code}: {}", self.stderr.trim()),
            None => write!(f, "command terminated without exit code: {}", self.stderr.trim()),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Errors from provider operations.
///
/// Implementation-specific errors (reqwest, hf-hub, io) are mapped to these
/// at the adapter boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The registry answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Request URL or server message.
        message: String,
    },

    /// Connection, timeout or TLS failure before a status was received.
    #[error("Network error: {message}")]
    Network {
        /// Description of the failure.
        message: String,
    },

    /// The registry answered with a body we could not understand.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was invalid.
        message: String,
    },

    /// A transfer command failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Local filesystem failure.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failure.
        message: String,
    },

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }

    /// The HTTP status, when the registry answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

// ============================================================================
// Traits
// ============================================================================

/// Per-file transfer capability.
///
/// Not every deployment has one; ask for it with
/// [`RemoteAssetProvider::file_fetcher`] before use.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Download one file of `identifier` into `destination`, preserving its
    /// relative path.
    async fn download_file(
        &self,
        identifier: &str,
        relative_path: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> Result<(), ProcessError>;
}

/// Port trait for a remote model registry.
///
/// # Design
///
/// - Capabilities (1) and (2) are always present
/// - Capability (3) is optional and returned as a shareable handle
/// - No retry policy is required here; adapters may add their own
#[async_trait]
pub trait RemoteAssetProvider: Send + Sync {
    /// Look up a collection by slug (`namespace/slug-id`).
    ///
    /// `token = None` forces an anonymous lookup.
    async fn fetch_collection(&self, slug: &str, token: Option<&str>) -> ProviderResult<Collection>;

    /// Download the whole repository tree of `identifier` into `destination`.
    async fn snapshot_download(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> ProviderResult<()>;

    /// The per-file transfer capability, if this deployment has one.
    fn file_fetcher(&self) -> Option<Arc<dyn FileFetcher>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the traits are object-safe
    fn _assert_object_safe(_: Arc<dyn RemoteAssetProvider>, _: Arc<dyn FileFetcher>) {}

    #[test]
    fn test_collection_model_ids_filters_types() {
        let collection = Collection {
            title: "Picks".to_string(),
            items: vec![
                CollectionItem::new("org/model-a", "model"),
                CollectionItem::new("org/data", "dataset"),
                CollectionItem::new("org/model-b", "model"),
                CollectionItem::new("org/space", "space"),
            ],
        };
        assert_eq!(collection.model_ids(), vec!["org/model-a", "org/model-b"]);
    }

    #[test]
    fn test_process_error_display() {
        let err = ProcessError::new(Some(1), "404 not found\n");
        assert_eq!(err.to_string(), "command exited with code 1: 404 not found");

        let provider_err: ProviderError = err.into();
        assert!(provider_err.to_string().contains("code 1"));
        assert_eq!(provider_err.status(), None);
    }

    #[test]
    fn test_http_status() {
        let err = ProviderError::Http {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.status(), Some(401));
    }
}
