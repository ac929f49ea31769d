//! Internal error types for hub operations.
//!
//! These errors are internal to `modelfetch-hub` and are mapped to core port
//! errors at the boundary.

use modelfetch_core::ProviderError;
use thiserror::Error;

/// Result type alias for hub operations.
pub type HubResult<T> = Result<T, HubError>;

/// Errors raised inside the hub adapter.
#[derive(Debug, Error)]
pub enum HubError {
    /// API request failed with an HTTP error status.
    #[error("Hub API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from hub API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// hf-hub SDK error.
    #[error("Hub SDK error: {0}")]
    Sdk(#[from] hf_hub::api::sync::ApiError),

    /// Filesystem error while placing snapshot files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Join(String),
}

/// Convert internal `HubError` to core `ProviderError`.
pub(crate) fn map_error(err: HubError) -> ProviderError {
    match err {
        HubError::ApiRequestFailed { status, url } => ProviderError::Http {
            status,
            message: url,
        },
        HubError::Network(e) => e.status().map_or_else(
            || ProviderError::Network {
                message: e.to_string(),
            },
            |status| ProviderError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            },
        ),
        HubError::InvalidResponse { message } => ProviderError::InvalidResponse { message },
        HubError::JsonParse(e) => ProviderError::InvalidResponse {
            message: e.to_string(),
        },
        HubError::Io(e) => ProviderError::from_io_error(&e),
        other @ (HubError::InvalidUrl(_) | HubError::Sdk(_) | HubError::Join(_)) => {
            ProviderError::Other {
                message: other.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = HubError::ApiRequestFailed {
            status: 404,
            url: "https://huggingface.co/api/collections/ns/slug".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("api/collections"));
    }

    #[test]
    fn test_map_status_is_preserved() {
        let mapped = map_error(HubError::ApiRequestFailed {
            status: 401,
            url: "u".to_string(),
        });
        assert_eq!(mapped.status(), Some(401));
    }

    #[test]
    fn test_map_invalid_response() {
        let mapped = map_error(HubError::InvalidResponse {
            message: "missing items".to_string(),
        });
        assert!(matches!(mapped, ProviderError::InvalidResponse { .. }));
    }

    #[test]
    fn test_map_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped = map_error(HubError::Io(io));
        assert!(matches!(mapped, ProviderError::Io { .. }));
    }

    #[test]
    fn test_map_join_is_other() {
        let mapped = map_error(HubError::Join("panicked".to_string()));
        assert_eq!(mapped.to_string(), "Background task failed: panicked");
    }
}
