//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports are implemented by adapters in other crates (`modelfetch-hub`,
//! `modelfetch-cli`) or by test fakes. No port mentions reqwest, hf-hub or
//! any other transport type.

pub mod credentials;
pub mod progress_sink;
pub mod provider;

pub use credentials::{
    CredentialStore, DEFAULT_TOKEN_ENV_VAR, EnvCredentialStore, MemoryCredentialStore,
    resolve_token,
};
pub use progress_sink::{NoopProgressSink, ProgressEvent, ProgressSink};
pub use provider::{
    Collection, CollectionItem, FileFetcher, ProcessError, ProviderError, ProviderResult,
    RemoteAssetProvider,
};
