//! Shared fakes for orchestrator integration tests.
//!
//! `FakeProvider` records every port call and can be given canned
//! collections, snapshot contents and a per-file fetcher. `RecordingSink`
//! keeps every progress event.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use modelfetch_core::{
    Collection, CollectionItem, FileFetcher, ProcessError, ProgressEvent, ProgressSink,
    ProviderError, ProviderResult, RemoteAssetProvider,
};
use tokio_util::sync::CancellationToken;

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Collection {
        slug: String,
        token: Option<String>,
    },
    Snapshot {
        identifier: String,
        destination: PathBuf,
        token: Option<String>,
    },
}

/// One recorded per-file transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCall {
    pub identifier: String,
    pub file: String,
    pub destination: PathBuf,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct FakeFetcher {
    failing: HashSet<String>,
    cancel_after: Option<(usize, CancellationToken)>,
    calls: Mutex<Vec<FileCall>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make transfers of `file` exit with code 1.
    pub fn failing(mut self, file: &str) -> Self {
        self.failing.insert(file.to_string());
        self
    }

    /// Cancel `token` once `count` transfers have been attempted.
    pub fn cancel_after(mut self, count: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((count, token));
        self
    }

    pub fn calls(&self) -> Vec<FileCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempted_files(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.file).collect()
    }
}

#[async_trait]
impl FileFetcher for FakeFetcher {
    async fn download_file(
        &self,
        identifier: &str,
        relative_path: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> Result<(), ProcessError> {
        let attempted = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(FileCall {
                identifier: identifier.to_string(),
                file: relative_path.to_string(),
                destination: destination.to_path_buf(),
                token: token.map(String::from),
            });
            calls.len()
        };
        if let Some((count, ref cancel)) = self.cancel_after
            && attempted >= count
        {
            cancel.cancel();
        }

        if self.failing.contains(relative_path) {
            return Err(ProcessError::new(Some(1), format!("404 Client Error: {relative_path}")));
        }

        let target = destination.join(relative_path);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, relative_path.as_bytes()).unwrap();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeProvider {
    collections: HashMap<String, ProviderResult<Collection>>,
    snapshot_files: Vec<String>,
    snapshot_error: Option<ProviderError>,
    snapshot_stall: Option<CancellationToken>,
    fetcher: Option<Arc<FakeFetcher>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `ids` (all of type model) plus one dataset for `slug`.
    pub fn with_collection(mut self, slug: &str, ids: &[&str]) -> Self {
        let mut items: Vec<CollectionItem> =
            ids.iter().map(|id| CollectionItem::new(*id, "model")).collect();
        items.push(CollectionItem::new("org/some-dataset", "dataset"));
        self.collections.insert(
            slug.to_string(),
            Ok(Collection {
                title: format!("Collection {slug}"),
                items,
            }),
        );
        self
    }

    pub fn with_collection_status(mut self, slug: &str, status: u16) -> Self {
        self.collections.insert(
            slug.to_string(),
            Err(ProviderError::Http {
                status,
                message: format!("https://huggingface.co/api/collections/{slug}"),
            }),
        );
        self
    }

    /// Files a snapshot writes into the destination.
    pub fn with_snapshot_files(mut self, files: &[&str]) -> Self {
        self.snapshot_files = files.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_snapshot_error(mut self, error: ProviderError) -> Self {
        self.snapshot_error = Some(error);
        self
    }

    /// Write the snapshot files, cancel `token`, then never finish.
    pub fn with_stalled_snapshot(mut self, token: CancellationToken) -> Self {
        self.snapshot_stall = Some(token);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<FakeFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAssetProvider for FakeProvider {
    async fn fetch_collection(&self, slug: &str, token: Option<&str>) -> ProviderResult<Collection> {
        self.calls.lock().unwrap().push(Call::Collection {
            slug: slug.to_string(),
            token: token.map(String::from),
        });
        self.collections
            .get(slug)
            .cloned()
            .unwrap_or_else(|| {
                Err(ProviderError::Http {
                    status: 404,
                    message: slug.to_string(),
                })
            })
    }

    async fn snapshot_download(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> ProviderResult<()> {
        self.calls.lock().unwrap().push(Call::Snapshot {
            identifier: identifier.to_string(),
            destination: destination.to_path_buf(),
            token: token.map(String::from),
        });
        if let Some(ref err) = self.snapshot_error {
            return Err(err.clone());
        }
        for file in &self.snapshot_files {
            let target = destination.join(file);
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(target, file.as_bytes()).unwrap();
        }
        if let Some(ref token) = self.snapshot_stall {
            token.cancel();
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    fn file_fetcher(&self) -> Option<Arc<dyn FileFetcher>> {
        self.fetcher
            .clone()
            .map(|fetcher| fetcher as Arc<dyn FileFetcher>)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn values(&self) -> Vec<i64> {
        self.events().iter().map(|e| e.value).collect()
    }

    /// Number of events that moved the counter forward.
    pub fn advances(&self) -> usize {
        let values = self.values();
        let mut previous = 0;
        values
            .into_iter()
            .filter(|&v| {
                let advanced = v > previous;
                previous = v;
                advanced
            })
            .count()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
