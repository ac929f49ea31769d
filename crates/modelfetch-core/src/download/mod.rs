//! Download domain types and errors.
//!
//! Pure data types: no I/O, networking, or runtime dependencies.
//!
//! # Structure
//!
//! - `types` - identifiers, categories, strategies and the request object
//! - `outcome` - per-file and aggregate results
//! - `errors` - the `FetchError` taxonomy

pub mod errors;
pub mod outcome;
pub mod types;

pub use errors::{FetchError, FetchResult};
pub use outcome::{BatchSummary, DownloadOutcome, FileOutcome, FileStatus};
pub use types::{Category, DownloadRequest, DownloadStrategy, ModelIdentifier, split_list};
