//! Path utilities: download root, destination planning and normalization.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Only [`ResolvedDestination::ensure_dir`] touches the filesystem for writing

mod destination;
mod download_root;
mod error;
mod platform;

#[cfg(test)]
pub(crate) mod test_utils;

pub use destination::{DestinationResolver, ResolvedDestination, sanitize_folder_name};
pub use download_root::{
    DEFAULT_DOWNLOAD_ROOT_RELATIVE, DOWNLOAD_ROOT_ENV_VAR, DownloadRootResolution,
    DownloadRootSource, default_download_root, resolve_download_root,
};
pub use error::PathError;
pub use platform::normalize_user_path;
