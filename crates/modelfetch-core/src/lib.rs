#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod download;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_SUBFOLDER, DESTINATION_PLACEHOLDER, FetchConfig};
pub use download::{
    BatchSummary, Category, DownloadOutcome, DownloadRequest, DownloadStrategy, FetchError,
    FetchResult, FileOutcome, FileStatus, ModelIdentifier, split_list,
};
pub use paths::{
    DestinationResolver, DownloadRootResolution, DownloadRootSource, PathError,
    ResolvedDestination, resolve_download_root, sanitize_folder_name,
};
pub use ports::{
    Collection, CollectionItem, CredentialStore, EnvCredentialStore, FileFetcher,
    MemoryCredentialStore, NoopProgressSink, ProcessError, ProgressEvent, ProgressSink,
    ProviderError, ProviderResult, RemoteAssetProvider, resolve_token,
};
