#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod cli;
mod collection;
mod config;
mod error;
mod http;
mod provider;
mod snapshot;

// ============================================================================
// Public API
// ============================================================================

// Provider
pub use provider::{DefaultHubProvider, HubProvider};

// Configuration
pub use config::{CliFlavor, HubClientConfig};

// Errors
pub use error::{HubError, HubResult};

// Building blocks
pub use cli::{CliFileFetcher, CommandInvocation, CommandOutput, CommandRunner, TokioCommandRunner};
pub use collection::CollectionClient;
pub use http::{HttpBackend, ReqwestBackend};
pub use snapshot::{CACHE_DIR_NAME, SnapshotDownloader};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
