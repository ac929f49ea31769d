//! Credential store port and token resolution.
//!
//! The ambient credential is read from the process environment once and kept
//! in an in-process scope. Promoting a token writes to that scope only; the
//! process environment is never mutated.

use std::env::{self, VarError};
use std::sync::RwLock;

use tracing::debug;

use crate::download::{FetchError, FetchResult};

/// Default name of the credential environment variable.
pub const DEFAULT_TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Read-only ambient credential accessor plus a narrow promotion call.
pub trait CredentialStore: Send + Sync {
    /// The ambient credential, if any.
    ///
    /// Returns an error when the credential exists but cannot be read.
    fn ambient(&self) -> FetchResult<Option<String>>;

    /// Make `token` the ambient credential for the rest of the process.
    fn promote(&self, token: &str);
}

/// Credential store seeded from an environment variable.
#[derive(Debug)]
pub struct EnvCredentialStore {
    var: String,
    promoted: RwLock<Option<String>>,
}

impl EnvCredentialStore {
    /// Create a store reading `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            promoted: RwLock::new(None),
        }
    }

    /// Name of the environment variable backing this store.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV_VAR)
    }
}

impl CredentialStore for EnvCredentialStore {
    fn ambient(&self) -> FetchResult<Option<String>> {
        if let Ok(guard) = self.promoted.read()
            && let Some(token) = guard.as_ref()
        {
            return Ok(Some(token.clone()));
        }

        match env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value.trim().to_string())),
            Ok(_) | Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(FetchError::unexpected(format!(
                "Credential variable {} is not valid unicode",
                self.var
            ))),
        }
    }

    fn promote(&self, token: &str) {
        if let Ok(mut guard) = self.promoted.write() {
            *guard = Some(token.to_string());
            debug!(var = %self.var, "Promoted token to ambient scope");
        }
    }
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Create a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn ambient(&self) -> FetchResult<Option<String>> {
        self.token
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| FetchError::unexpected("credential store lock poisoned"))
    }

    fn promote(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }
}

/// Resolve the token for one run.
///
/// Precedence: explicit per-call token, then the ambient credential, then
/// anonymous access (`None`). Empty explicit tokens count as absent.
pub fn resolve_token(
    explicit: Option<&str>,
    store: &dyn CredentialStore,
) -> FetchResult<Option<String>> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(token.to_string()));
    }
    store.ambient()
}
