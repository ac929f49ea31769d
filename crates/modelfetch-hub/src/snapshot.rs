//! Whole-repository downloads via the hf-hub sync API.
//!
//! The SDK is blocking, so every download runs on tokio's blocking pool. Files
//! land in the SDK cache under `<destination>/.cache` first, are moved to
//! `<destination>/<rfilename>`, and the cache is removed afterwards.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use tracing::{debug, info, warn};

use crate::error::{HubError, HubResult};

/// Name of the SDK cache directory inside a destination.
pub const CACHE_DIR_NAME: &str = ".cache";

/// Snapshot downloader bound to one registry endpoint.
#[derive(Debug, Clone)]
pub struct SnapshotDownloader {
    endpoint: String,
}

impl SnapshotDownloader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Download every file of `identifier` into `destination`.
    ///
    /// Returns the number of files placed.
    pub async fn download(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> HubResult<usize> {
        let endpoint = self.endpoint.clone();
        let identifier = identifier.to_string();
        let destination = destination.to_path_buf();
        let token = token.map(String::from);

        tokio::task::spawn_blocking(move || {
            download_blocking(&endpoint, &identifier, &destination, token)
        })
        .await
        .map_err(|e| HubError::Join(e.to_string()))?
    }
}

fn download_blocking(
    endpoint: &str,
    identifier: &str,
    destination: &Path,
    token: Option<String>,
) -> HubResult<usize> {
    let cache_dir = destination.join(CACHE_DIR_NAME);
    let result = fetch_into(endpoint, identifier, destination, &cache_dir, token);
    discard_cache(&cache_dir);
    result
}

fn fetch_into(
    endpoint: &str,
    identifier: &str,
    destination: &Path,
    cache_dir: &Path,
    token: Option<String>,
) -> HubResult<usize> {
    let api = ApiBuilder::new()
        .with_endpoint(endpoint.trim_end_matches('/').to_string())
        .with_cache_dir(cache_dir.to_path_buf())
        .with_token(token)
        .with_progress(false)
        .build()?;

    let repo = api.model(identifier.to_string());
    let info = repo.info()?;
    info!(identifier, files = info.siblings.len(), "Downloading snapshot");

    for sibling in &info.siblings {
        let cached = repo.get(&sibling.rfilename)?;
        let placed = place_file(&cached, destination, &sibling.rfilename)?;
        debug!(file = %placed.display(), "Placed snapshot file");
    }

    Ok(info.siblings.len())
}

/// Move a cached file to `<destination>/<relative>`, creating parents.
///
/// `cached` may be the SDK's symlink pointer; the blob it resolves to is
/// moved, or copied when it cannot be renamed. Relative paths that would
/// escape `destination` are rejected.
pub(crate) fn place_file(cached: &Path, destination: &Path, relative: &str) -> HubResult<PathBuf> {
    let relative_path = Path::new(relative);
    let escapes = relative_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if relative.is_empty() || escapes {
        return Err(HubError::InvalidResponse {
            message: format!("refusing to place file outside destination: {relative}"),
        });
    }

    let target = destination.join(relative_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let blob = fs::canonicalize(cached)?;
    if let Err(e) = fs::rename(&blob, &target) {
        debug!(error = %e, blob = %blob.display(), "Rename failed, copying instead");
        fs::copy(&blob, &target)?;
    }
    Ok(target)
}

/// Remove the SDK cache of a destination.
pub(crate) fn discard_cache(cache_dir: &Path) {
    match fs::remove_dir_all(cache_dir) {
        Ok(()) => debug!(dir = %cache_dir.display(), "Removed snapshot cache"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %cache_dir.display(), error = %e, "Failed to remove snapshot cache"),
    }
}
