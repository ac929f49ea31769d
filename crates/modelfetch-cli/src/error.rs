//! CLI-specific error types and mappings.
//!
//! Maps library errors to exit codes and user-facing messages.

use modelfetch_core::{FetchError, PathError};
use modelfetch_hub::HubError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or request validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Download root or tool setup error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The registry rejected the credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Remote lookup or transport failure.
    #[error("{0}")]
    Remote(String),

    /// IO error (permission denied, not a directory, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// The download ran but did not complete for every file.
    #[error("Download incomplete")]
    Incomplete,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Incomplete | Self::Other(_) => 1,
            Self::Arguments(_) => 2,
            Self::Remote(_) => 69,       // EX_UNAVAILABLE
            Self::Io(_) => 74,           // EX_IOERR
            Self::Unauthorized(_) => 77, // EX_NOPERM
            Self::Config(_) => 78,       // EX_CONFIG
        }
    }

    /// Exit code for an error that reached `main`.
    pub fn exit_code_for(err: &anyhow::Error) -> u8 {
        err.downcast_ref::<Self>().map_or(1, Self::exit_code)
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match err {
            FetchError::Unauthorized { .. } => Self::Unauthorized(message),
            FetchError::NotFound { .. } | FetchError::Transport { .. } => Self::Remote(message),
            FetchError::NoFilesSpecified | FetchError::InvalidRequest { .. } => {
                Self::Arguments(message)
            }
            FetchError::CapabilityMissing { .. } => Self::Config(message),
            FetchError::Io { .. } => Self::Io(message),
            FetchError::Process { .. } | FetchError::Unexpected { .. } => Self::Other(message),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<HubError> for CliError {
    fn from(err: HubError) -> Self {
        Self::Config(format!("failed to initialise hub client: {err}"))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_map_to_exit_codes() {
        let unauthorized: CliError = FetchError::Unauthorized {
            slug: "ns/private".to_string(),
        }
        .into();
        assert_eq!(unauthorized.exit_code(), 77);
        assert!(unauthorized.to_string().contains("ns/private"));

        let missing: CliError = FetchError::NotFound {
            slug: "ns/gone".to_string(),
        }
        .into();
        assert_eq!(missing.exit_code(), 69);

        let no_files: CliError = FetchError::NoFilesSpecified.into();
        assert_eq!(no_files.exit_code(), 2);

        let capability: CliError = FetchError::capability_missing("Per-file download CLI", "install it").into();
        assert_eq!(capability.exit_code(), 78);
    }

    #[test]
    fn test_exit_code_for_anyhow() {
        let err = anyhow::Error::from(CliError::Incomplete);
        assert_eq!(CliError::exit_code_for(&err), 1);

        let err = anyhow::Error::from(CliError::Io("disk full".to_string()));
        assert_eq!(CliError::exit_code_for(&err), 74);

        let err = anyhow::anyhow!("something else");
        assert_eq!(CliError::exit_code_for(&err), 1);
    }

    #[test]
    fn test_path_error_is_config() {
        let err: CliError = PathError::NoHomeDir.into();
        assert_eq!(err.exit_code(), 78);
    }
}
