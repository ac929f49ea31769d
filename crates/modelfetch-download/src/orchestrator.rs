//! Download orchestration.
//!
//! One [`DownloadOrchestrator::run`] call takes a [`DownloadRequest`] through
//! token resolution, identifier resolution, destination planning, the chosen
//! transfer strategy and exclusion cleanup, and always returns exactly one
//! [`DownloadOutcome`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use modelfetch_core::{
    BatchSummary, CredentialStore, DestinationResolver, DownloadOutcome, DownloadRequest,
    DownloadStrategy, FetchConfig, FetchError, FileFetcher, FileOutcome, FileStatus,
    ModelIdentifier, NoopProgressSink, ProgressSink, RemoteAssetProvider, resolve_token,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::filter::{is_excluded, remove_excluded_with};
use crate::progress::ProgressReporter;
use crate::resolver::{IdentifierResolver, extract_slug, is_collection_url};

/// Capability name reported when no per-file fetcher exists.
pub const PER_FILE_CAPABILITY: &str = "Per-file download CLI";

/// Hint reported when no per-file fetcher exists.
pub const PER_FILE_HINT: &str = "Install huggingface-cli (pip install -U \"huggingface_hub[cli]\") \
     or modelscope (pip install modelscope), or enable snapshot mode.";

/// Run states, logged as the orchestrator moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    TokenResolved,
    DestinationResolved,
    SnapshotTransfer,
    SelectiveTransfer,
    Filtered,
    Done,
}

/// Drives a remote asset provider for one request at a time.
pub struct DownloadOrchestrator {
    provider: Arc<dyn RemoteAssetProvider>,
    credentials: Arc<dyn CredentialStore>,
    resolver: IdentifierResolver,
    destinations: DestinationResolver,
    sink: Arc<dyn ProgressSink>,
    cancel: Option<CancellationToken>,
    remove_file: fn(&Path) -> io::Result<()>,
}

impl DownloadOrchestrator {
    /// Create an orchestrator with a no-op progress sink.
    pub fn new(
        provider: Arc<dyn RemoteAssetProvider>,
        credentials: Arc<dyn CredentialStore>,
        config: FetchConfig,
    ) -> Self {
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&provider), Arc::clone(&credentials)),
            provider,
            credentials,
            destinations: DestinationResolver::new(config),
            sink: Arc::new(NoopProgressSink),
            cancel: None,
            remove_file: |path| fs::remove_file(path),
        }
    }

    /// Send progress events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Stop once `token` is cancelled: selective transfers before the next
    /// file, snapshots immediately.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub const fn destinations(&self) -> &DestinationResolver {
        &self.destinations
    }

    /// Run one request to completion.
    ///
    /// Never fails: every error becomes the outcome's message.
    pub async fn run(&self, request: &DownloadRequest) -> DownloadOutcome {
        let outcome = match self.try_run(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(identifier = %request.identifier, error = %err, "Download request failed");
                DownloadOutcome::from_error(err)
            }
        };
        enter(Phase::Done, &request.identifier);
        outcome
    }

    async fn try_run(&self, request: &DownloadRequest) -> Result<DownloadOutcome, FetchError> {
        enter(Phase::Idle, &request.identifier);

        let token = resolve_token(request.token.as_deref(), self.credentials.as_ref())?;
        if let Some(ref token) = token {
            self.credentials.promote(token);
        }
        enter(Phase::TokenResolved, &request.identifier);

        // Selective preconditions come before any network call.
        let selective = match request.strategy {
            DownloadStrategy::Snapshot => None,
            DownloadStrategy::Selective => Some(self.selective_plan(request)?),
        };

        let identifiers = self
            .resolver
            .resolve(
                &request.identifier,
                request.expand_collection,
                request.authorize_collection,
            )
            .await?;

        if identifiers.is_empty() {
            let slug = if request.expand_collection || is_collection_url(&request.identifier) {
                extract_slug(request.identifier.trim())
            } else {
                request.identifier.clone()
            };
            return Ok(DownloadOutcome::success(
                format!("Collection '{slug}' contains no models; nothing was downloaded."),
                None,
            ));
        }

        let total = identifiers.len();
        let mut outcomes = Vec::with_capacity(total);
        for (idx, identifier) in identifiers.iter().enumerate() {
            if total > 1 {
                info!(model = %identifier, index = idx + 1, total, "Processing collection model");
            }
            let outcome = match &selective {
                None => self.snapshot(identifier, request, token.as_deref()).await,
                Some((fetcher, files)) => {
                    self.selective(identifier, request, fetcher.as_ref(), files, token.as_deref())
                        .await
                }
            };
            outcomes.push(outcome);
        }

        Ok(DownloadOutcome::merge(outcomes))
    }

    /// Validate a selective request: a non-empty file list and a per-file fetcher.
    fn selective_plan(
        &self,
        request: &DownloadRequest,
    ) -> Result<(Arc<dyn FileFetcher>, Vec<String>), FetchError> {
        let files: Vec<String> = request
            .files
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect();
        if files.is_empty() {
            return Err(FetchError::NoFilesSpecified);
        }

        let fetcher = self
            .provider
            .file_fetcher()
            .ok_or_else(|| FetchError::capability_missing(PER_FILE_CAPABILITY, PER_FILE_HINT))?;
        Ok((fetcher, files))
    }

    /// Plan and create the model folder for `identifier`.
    fn prepare_destination(
        &self,
        identifier: &ModelIdentifier,
        request: &DownloadRequest,
    ) -> Result<PathBuf, FetchError> {
        let plan = self.destinations.plan(
            identifier,
            request.category,
            request.destination_override.as_deref(),
        )?;
        plan.ensure_dir()?;
        enter(Phase::DestinationResolved, identifier.as_str());
        debug!(model_dir = %plan.model_dir.display(), "Destination ready");
        Ok(plan.model_dir)
    }

    async fn snapshot(
        &self,
        identifier: &ModelIdentifier,
        request: &DownloadRequest,
        token: Option<&str>,
    ) -> DownloadOutcome {
        let model_dir = match self.prepare_destination(identifier, request) {
            Ok(dir) => dir,
            Err(err) => return DownloadOutcome::from_error(err),
        };
        if self.is_cancelled() {
            return cancelled_snapshot(identifier);
        }

        enter(Phase::SnapshotTransfer, identifier.as_str());
        let mut reporter = ProgressReporter::new(1, Arc::clone(&self.sink));
        reporter.update(0, Some(&format!("Downloading model snapshot: {identifier}")));

        let transfer = self
            .provider
            .snapshot_download(identifier.as_str(), &model_dir, token);
        let result = match self.cancel.as_ref() {
            Some(cancel) => tokio::select! {
                result = transfer => result,
                () = cancel.cancelled() => {
                    warn!(model = %identifier, "Snapshot download cancelled");
                    return cancelled_snapshot(identifier);
                }
            },
            None => transfer.await,
        };
        if let Err(err) = result {
            error!(model = %identifier, error = %err, "Snapshot download failed");
            return DownloadOutcome::failure(format!("Error downloading model: {err}"));
        }
        reporter.update(1, Some("Download complete"));

        self.cleanup_excluded(&model_dir, &request.exclude);
        enter(Phase::Filtered, identifier.as_str());

        info!(model = %identifier, dir = %model_dir.display(), "Snapshot downloaded");
        DownloadOutcome::success(
            format!("Downloaded model: {identifier} to {}", model_dir.display()),
            Some(model_dir),
        )
    }

    async fn selective(
        &self,
        identifier: &ModelIdentifier,
        request: &DownloadRequest,
        fetcher: &dyn FileFetcher,
        files: &[String],
        token: Option<&str>,
    ) -> DownloadOutcome {
        let model_dir = match self.prepare_destination(identifier, request) {
            Ok(dir) => dir,
            Err(err) => return DownloadOutcome::from_error(err),
        };

        enter(Phase::SelectiveTransfer, identifier.as_str());
        let total = files.len();
        #[allow(clippy::cast_possible_wrap)]
        let mut reporter = ProgressReporter::new(total as i64, Arc::clone(&self.sink));
        let mut results = Vec::with_capacity(total);

        for (idx, file) in files.iter().enumerate() {
            let position = idx + 1;
            if self.is_cancelled() {
                warn!(model = %identifier, remaining = total - idx, "Download cancelled");
                results.extend(
                    files[idx..]
                        .iter()
                        .map(|f| FileOutcome::new(f.as_str(), FileStatus::Cancelled)),
                );
                break;
            }

            if is_excluded(file, &request.exclude) {
                reporter.update(
                    1,
                    Some(&format!("Skipping excluded file {position}/{total}: {file}")),
                );
                results.push(FileOutcome::new(file.as_str(), FileStatus::Skipped));
                continue;
            }

            reporter.update(0, Some(&format!("Downloading file {position}/{total}: {file}")));
            let status = match fetcher
                .download_file(identifier.as_str(), file, &model_dir, token)
                .await
            {
                Ok(()) => {
                    reporter.update(1, Some(&format!("Downloaded {file}")));
                    FileStatus::Downloaded
                }
                Err(err) => {
                    error!(
                        model = %identifier,
                        file = %file,
                        exit_code = ?err.exit_code,
                        stderr = %err.stderr.trim(),
                        "Error downloading file"
                    );
                    reporter.update(1, Some(&format!("Failed to download {file}")));
                    FileStatus::Failed(FetchError::Process {
                        exit_code: err.exit_code,
                        stderr: err.stderr,
                    })
                }
            };
            results.push(FileOutcome::new(file.as_str(), status));
        }
        enter(Phase::Filtered, identifier.as_str());

        let summary = BatchSummary::from_outcomes(&results);
        let message = selective_message(identifier, &model_dir, &summary);
        info!(
            model = %identifier,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Selective download finished"
        );

        let mut outcome = DownloadOutcome::success(message, Some(model_dir)).with_files(results);
        if summary.cancelled > 0 {
            outcome.success = false;
        }
        outcome
    }

    /// Remove excluded files, logging and then ignoring removal failures.
    fn cleanup_excluded(&self, model_dir: &Path, exclude: &[String]) {
        for result in remove_excluded_with(model_dir, exclude, self.remove_file) {
            match result {
                Ok(path) => debug!(path = %path.display(), "Removed excluded file"),
                Err(err) => warn!(error = %err, "Skipping excluded file cleanup"),
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

fn cancelled_snapshot(identifier: &ModelIdentifier) -> DownloadOutcome {
    DownloadOutcome::failure(format!("Download of {identifier} cancelled"))
}

fn enter(phase: Phase, identifier: &str) {
    debug!(?phase, identifier, "Orchestrator phase");
}

fn selective_message(identifier: &ModelIdentifier, model_dir: &Path, summary: &BatchSummary) -> String {
    let mut message = format!(
        "Downloaded selected files from {identifier} to {}",
        model_dir.display()
    );
    if summary.failed > 0 {
        message.push_str(&format!(
            " ({} of {} files failed)",
            summary.failed, summary.requested
        ));
    }
    if summary.cancelled > 0 {
        message.push_str(&format!(
            " ({} of {} files cancelled)",
            summary.cancelled, summary.requested
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use modelfetch_core::{Collection, MemoryCredentialStore, ProviderError, ProviderResult};

    /// Writes fixed files into the destination on snapshot.
    struct SnapshotWriter(Vec<&'static str>);

    #[async_trait]
    impl RemoteAssetProvider for SnapshotWriter {
        async fn fetch_collection(&self, slug: &str, _token: Option<&str>) -> ProviderResult<Collection> {
            Err(ProviderError::Http {
                status: 404,
                message: slug.to_string(),
            })
        }

        async fn snapshot_download(
            &self,
            _identifier: &str,
            destination: &Path,
            _token: Option<&str>,
        ) -> ProviderResult<()> {
            for file in &self.0 {
                fs::write(destination.join(file), file.as_bytes())
                    .map_err(|e| ProviderError::from_io_error(&e))?;
            }
            Ok(())
        }

        fn file_fetcher(&self) -> Option<Arc<dyn FileFetcher>> {
            None
        }
    }

    #[tokio::test]
    async fn test_snapshot_ignores_cleanup_failures() {
        let root = tempfile::tempdir().unwrap();
        let mut orchestrator = DownloadOrchestrator::new(
            Arc::new(SnapshotWriter(vec!["a.bin", "notes.md", "extra.txt"])),
            Arc::new(MemoryCredentialStore::default()),
            FetchConfig::new(root.path()),
        );
        orchestrator.remove_file = |path| {
            if path.ends_with("notes.md") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            } else {
                fs::remove_file(path)
            }
        };

        let request = DownloadRequest::new("org/model")
            .with_strategy(DownloadStrategy::Snapshot)
            .with_exclude_csv("notes.md,extra.txt");
        let outcome = orchestrator.run(&request).await;

        let model_dir = root.path().join("IF_AI").join("model");
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.destination.as_deref(), Some(model_dir.as_path()));
        assert!(outcome.error.is_none());
        assert!(model_dir.join("a.bin").exists());
        assert!(model_dir.join("notes.md").exists());
        assert!(!model_dir.join("extra.txt").exists());
    }

    fn summary(requested: usize, failed: usize, cancelled: usize) -> BatchSummary {
        BatchSummary {
            requested,
            downloaded: requested - failed - cancelled,
            skipped: 0,
            failed,
            cancelled,
        }
    }

    #[test]
    fn test_selective_message_clean() {
        let id = ModelIdentifier::new("org/model").unwrap();
        let msg = selective_message(&id, Path::new("/dl/model"), &summary(2, 0, 0));
        assert_eq!(msg, "Downloaded selected files from org/model to /dl/model");
    }

    #[test]
    fn test_selective_message_counts_failures() {
        let id = ModelIdentifier::new("org/model").unwrap();
        let msg = selective_message(&id, Path::new("/dl/model"), &summary(3, 1, 0));
        assert!(msg.ends_with("(1 of 3 files failed)"));

        let msg = selective_message(&id, Path::new("/dl/model"), &summary(3, 0, 2));
        assert!(msg.ends_with("(2 of 3 files cancelled)"));
    }
}
