#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod filter;
pub mod orchestrator;
pub mod progress;
pub mod resolver;

pub use filter::{CleanupError, is_excluded, remove_excluded, remove_excluded_with};
pub use orchestrator::{DownloadOrchestrator, PER_FILE_CAPABILITY, PER_FILE_HINT};
pub use progress::{ProgressReporter, format_bytes};
pub use resolver::{IdentifierResolver, extract_slug, is_collection_url};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
