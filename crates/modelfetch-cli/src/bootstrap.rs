//! CLI bootstrap - the composition root.
//!
//! This module is the only place where concrete implementations are wired
//! together for the CLI:
//! - Download root resolution and `FetchConfig`
//! - Environment-backed credential store
//! - Hub provider (collection client, snapshot downloader, per-file CLI lookup)

use std::sync::Arc;

use modelfetch_core::{
    CredentialStore, DownloadRootResolution, EnvCredentialStore, FetchConfig,
    RemoteAssetProvider, resolve_download_root,
};
use modelfetch_download::{DownloadOrchestrator, IdentifierResolver};
use modelfetch_hub::{CliFlavor, DefaultHubProvider, HubClientConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `--verbose`. Logs go to stderr so stdout stays clean for results.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `--download-root` override.
    pub download_root: Option<String>,
    /// Hub endpoint override.
    pub endpoint: Option<String>,
    /// External CLI used for per-file downloads.
    pub cli_flavor: CliFlavor,
}

/// Fully composed context for commands that talk to the hub.
pub struct CliContext {
    /// Where the download root came from.
    pub root: DownloadRootResolution,
    /// Destination configuration.
    pub config: FetchConfig,
    /// Credential store seeded from the environment.
    pub credentials: Arc<dyn CredentialStore>,
    /// Hub provider.
    pub provider: Arc<dyn RemoteAssetProvider>,
}

impl CliContext {
    /// Build a download orchestrator over this context.
    pub fn orchestrator(&self) -> DownloadOrchestrator {
        DownloadOrchestrator::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.credentials),
            self.config.clone(),
        )
    }

    /// Build an identifier resolver over this context.
    pub fn resolver(&self) -> IdentifierResolver {
        IdentifierResolver::new(Arc::clone(&self.provider), Arc::clone(&self.credentials))
    }
}

/// Bootstrap the CLI context.
///
/// 1. Resolves the download root (flag, env var, default)
/// 2. Creates the credential store for the flavor's token variable
/// 3. Builds the hub provider, looking up the per-file CLI
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let root = resolve_download_root(config.download_root.as_deref())?;
    debug!(root = %root.path.display(), source = %root.source, "Resolved download root");
    let fetch_config = FetchConfig::new(root.path.clone())
        .with_token_env_var(config.cli_flavor.credential_env_var());

    let credentials: Arc<dyn CredentialStore> =
        Arc::new(EnvCredentialStore::new(fetch_config.token_env_var()));

    let mut hub_config = HubClientConfig::new().with_cli_flavor(config.cli_flavor);
    if let Some(endpoint) = config.endpoint.filter(|e| !e.trim().is_empty()) {
        hub_config = hub_config.with_endpoint(endpoint.trim().trim_end_matches('/'));
    }
    let provider: Arc<dyn RemoteAssetProvider> = Arc::new(DefaultHubProvider::new(&hub_config)?);

    Ok(CliContext {
        root,
        config: fetch_config,
        credentials,
        provider,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelfetch_core::DownloadRootSource;

    #[test]
    fn test_bootstrap_with_explicit_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().into_owned();

        let ctx = bootstrap(CliConfig {
            download_root: Some(root),
            endpoint: Some("https://mirror.example.com/".to_string()),
            cli_flavor: CliFlavor::HuggingFace,
        })
        .unwrap();

        assert_eq!(ctx.root.source, DownloadRootSource::Explicit);
        assert_eq!(ctx.config.download_root(), dir.path());
        assert_eq!(ctx.orchestrator().destinations().config().download_root(), dir.path());
        assert_eq!(ctx.config.token_env_var(), "HF_TOKEN");
    }

    #[test]
    fn test_bootstrap_modelscope_reads_its_own_token() {
        let dir = tempfile::tempdir().unwrap();

        let ctx = bootstrap(CliConfig {
            download_root: Some(dir.path().to_string_lossy().into_owned()),
            endpoint: None,
            cli_flavor: CliFlavor::ModelScope,
        })
        .unwrap();

        assert_eq!(ctx.config.token_env_var(), "MODELSCOPE_API_TOKEN");
    }
}
