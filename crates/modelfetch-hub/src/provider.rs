//! `RemoteAssetProvider` implementation.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use modelfetch_core::{Collection, FileFetcher, ProviderError, ProviderResult, RemoteAssetProvider};

use crate::cli::{CliFileFetcher, TokioCommandRunner};
use crate::collection::CollectionClient;
use crate::config::{CliFlavor, HubClientConfig};
use crate::error::{HubResult, map_error};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::snapshot::SnapshotDownloader;

/// Production provider: reqwest collection client, hf-hub snapshots, CLI per-file.
///
/// With the ModelScope flavor, snapshots also go through the CLI.
pub type DefaultHubProvider = HubProvider<ReqwestBackend>;

/// Remote asset provider over the hub API, generic over the HTTP backend.
pub struct HubProvider<B: HttpBackend> {
    collections: CollectionClient<B>,
    snapshots: SnapshotDownloader,
    file_fetcher: Option<Arc<CliFileFetcher>>,
    cli_flavor: CliFlavor,
}

impl DefaultHubProvider {
    /// Build the production provider, looking up the per-file CLI on `PATH`.
    pub fn new(config: &HubClientConfig) -> HubResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        let fetcher = CliFileFetcher::locate(config.cli_flavor, Arc::new(TokioCommandRunner));
        Ok(Self::with_parts(backend, config, fetcher))
    }
}

impl<B: HttpBackend> HubProvider<B> {
    /// Assemble a provider from explicit parts.
    pub fn with_parts(
        backend: B,
        config: &HubClientConfig,
        file_fetcher: Option<CliFileFetcher>,
    ) -> Self {
        Self {
            collections: CollectionClient::new(backend, config.endpoint.clone()),
            snapshots: SnapshotDownloader::new(config.endpoint.clone()),
            file_fetcher: file_fetcher.map(Arc::new),
            cli_flavor: config.cli_flavor,
        }
    }

    /// Which CLI this provider uses (or would use) for per-file downloads.
    pub const fn cli_flavor(&self) -> CliFlavor {
        self.cli_flavor
    }
}

#[async_trait]
impl<B: HttpBackend> RemoteAssetProvider for HubProvider<B> {
    async fn fetch_collection(&self, slug: &str, token: Option<&str>) -> ProviderResult<Collection> {
        self.collections.fetch(slug, token).await.map_err(map_error)
    }

    async fn snapshot_download(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> ProviderResult<()> {
        match self.cli_flavor {
            CliFlavor::HuggingFace => self
                .snapshots
                .download(identifier, destination, token)
                .await
                .map(|_| ())
                .map_err(map_error),
            CliFlavor::ModelScope => {
                let fetcher = self.file_fetcher.as_ref().ok_or_else(|| ProviderError::Other {
                    message: format!(
                        "{} is required for ModelScope snapshots. {}",
                        self.cli_flavor.program(),
                        self.cli_flavor.install_hint()
                    ),
                })?;
                fetcher
                    .download_snapshot(identifier, destination, token)
                    .await
                    .map_err(ProviderError::from)
            }
        }
    }

    fn file_fetcher(&self) -> Option<Arc<dyn FileFetcher>> {
        self.file_fetcher
            .clone()
            .map(|fetcher| fetcher as Arc<dyn FileFetcher>)
    }
}
