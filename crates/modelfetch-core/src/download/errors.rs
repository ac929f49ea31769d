//! Fetch error taxonomy.
//!
//! These errors are the single vocabulary the orchestrator reports in. They are
//! cloneable and comparable so per-file failures can be collected into outcomes
//! and asserted on in tests. I/O errors are captured as kind + message strings.

use thiserror::Error;

/// Error type for resolution and download operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The registry rejected the credential (HTTP 401).
    #[error(
        "Authentication failed (401 Unauthorized) for '{slug}'. \
         If this is a private collection, your token may be invalid or missing."
    )]
    Unauthorized {
        /// The collection slug that was requested.
        slug: String,
    },

    /// The collection or model does not exist (HTTP 404).
    #[error("Collection not found (404): '{slug}'. Please check the URL or slug.")]
    NotFound {
        /// The collection slug that was requested.
        slug: String,
    },

    /// Any other HTTP-layer failure.
    #[error("HTTP error: {message}")]
    Transport {
        /// Detailed error message.
        message: String,
        /// HTTP status code if the server answered.
        status: Option<u16>,
    },

    /// The provider cannot perform the requested kind of transfer.
    #[error("{capability} is not available. {hint}")]
    CapabilityMissing {
        /// Name of the missing capability.
        capability: String,
        /// How to make it available.
        hint: String,
    },

    /// Selective mode was requested without any file paths.
    #[error("No files specified. Provide file paths or enable snapshot mode.")]
    NoFilesSpecified,

    /// The request itself is malformed (empty identifier, unknown category, ...).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong.
        message: String,
    },

    /// Filesystem error while preparing or cleaning a destination.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g. "`NotFound`", "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// A per-file transfer command failed.
    #[error("Process failed ({}): {stderr}", describe_exit(.exit_code))]
    Process {
        /// Exit code of the transfer command, `None` when killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error of the command.
        stderr: String,
    },

    /// Anything else, including snapshot and credential failures.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message.
        message: String,
    },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"))
}

impl FetchError {
    /// Create a transport error without a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Create a capability-missing error.
    pub fn capability_missing(capability: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::CapabilityMissing {
            capability: capability.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io {
            kind: format!("{:?}", err.kind()),
            message: err.to_string(),
        }
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Whether this error only affects a single file of a batch.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::Process { .. })
    }
}

/// Convenience result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
