//! Public configuration for the hub adapter.

use std::time::Duration;

/// Which external CLI performs per-file downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CliFlavor {
    /// `huggingface-cli download <id> <file> --local-dir <dir>`
    #[default]
    HuggingFace,
    /// `modelscope download --model <id> <file> --local_dir <dir>`
    ModelScope,
}

impl CliFlavor {
    /// Executable name looked up on `PATH`.
    pub const fn program(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface-cli",
            Self::ModelScope => "modelscope",
        }
    }

    /// Install instructions shown when the executable is missing.
    pub const fn install_hint(self) -> &'static str {
        match self {
            Self::HuggingFace => "Install with: pip install -U \"huggingface_hub[cli]\"",
            Self::ModelScope => "Install with: pip install modelscope",
        }
    }

    /// Environment variable holding the ambient token for this hub.
    pub const fn credential_env_var(self) -> &'static str {
        match self {
            Self::HuggingFace => "HF_TOKEN",
            Self::ModelScope => "MODELSCOPE_API_TOKEN",
        }
    }

    /// Environment variable the CLI reads its token from, when it has no flag for it.
    pub const fn token_env_var(self) -> Option<&'static str> {
        match self {
            Self::HuggingFace => None,
            Self::ModelScope => Some("MODELSCOPE_API_TOKEN"),
        }
    }
}

impl std::str::FromStr for CliFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" | "huggingface-cli" => Ok(Self::HuggingFace),
            "modelscope" | "ms" => Ok(Self::ModelScope),
            other => Err(format!(
                "unknown CLI flavor '{other}' (expected 'huggingface' or 'modelscope')"
            )),
        }
    }
}

/// Configuration for the hub adapter.
///
/// # Example
///
/// ```
/// use modelfetch_hub::{CliFlavor, HubClientConfig};
/// use std::time::Duration;
///
/// let config = HubClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_cli_flavor(CliFlavor::ModelScope);
/// ```
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// Registry base URL
    pub(crate) endpoint: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
    /// Per-file CLI
    pub(crate) cli_flavor: CliFlavor,
}

impl Default for HubClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://huggingface.co".to_string(),
            user_agent: concat!("modelfetch-hub/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            cli_flavor: CliFlavor::default(),
        }
    }
}

impl HubClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registry base URL.
    ///
    /// Defaults to `https://huggingface.co`.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Choose the per-file CLI.
    #[must_use]
    pub const fn with_cli_flavor(mut self, flavor: CliFlavor) -> Self {
        self.cli_flavor = flavor;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub const fn cli_flavor(&self) -> CliFlavor {
        self.cli_flavor
    }
}
