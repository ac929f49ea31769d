//! Identifier resolution and collection expansion.

use std::sync::Arc;

use modelfetch_core::{
    CredentialStore, FetchError, FetchResult, ModelIdentifier, ProviderError, RemoteAssetProvider,
};
use tracing::{debug, info, warn};

/// Whether `input` is a collection URL (`http...` with `collections/<ns>/<slug>` at the end).
pub fn is_collection_url(input: &str) -> bool {
    collection_slug_from_url(input).is_some()
}

/// Extract `ns/slug` from a collection URL; any other input is returned unchanged.
///
/// ```
/// use modelfetch_download::extract_slug;
///
/// assert_eq!(
///     extract_slug("https://huggingface.co/collections/ns/picks-123/"),
///     "ns/picks-123"
/// );
/// assert_eq!(extract_slug("org/model"), "org/model");
/// ```
pub fn extract_slug(input: &str) -> String {
    collection_slug_from_url(input).unwrap_or_else(|| input.to_string())
}

fn collection_slug_from_url(input: &str) -> Option<String> {
    if !input.starts_with("http") {
        return None;
    }
    let parts: Vec<&str> = input.trim_matches('/').split('/').collect();
    match parts.as_slice() {
        [.., "collections", namespace, slug] => Some(format!("{namespace}/{slug}")),
        _ => None,
    }
}

/// Map a provider failure of a collection lookup into the fetch taxonomy.
fn map_collection_error(slug: &str, err: ProviderError) -> FetchError {
    match err {
        ProviderError::Http { status: 401, .. } => FetchError::Unauthorized {
            slug: slug.to_string(),
        },
        ProviderError::Http { status: 404, .. } => FetchError::NotFound {
            slug: slug.to_string(),
        },
        ProviderError::Http { status, message } => FetchError::Transport {
            message: format!("HTTP {status}: {message}"),
            status: Some(status),
        },
        ProviderError::Network { message } => FetchError::Transport {
            message,
            status: None,
        },
        other => FetchError::unexpected(format!(
            "An unexpected error occurred while fetching the collection: {other}"
        )),
    }
}

/// Resolves user input into model identifiers.
pub struct IdentifierResolver {
    provider: Arc<dyn RemoteAssetProvider>,
    credentials: Arc<dyn CredentialStore>,
}

impl IdentifierResolver {
    pub fn new(
        provider: Arc<dyn RemoteAssetProvider>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Resolve `input` into identifiers.
    ///
    /// Collection URLs are always expanded; bare slugs only when `expand` is set.
    /// Anything else is a single direct identifier.
    pub async fn resolve(
        &self,
        input: &str,
        expand: bool,
        authorize: bool,
    ) -> FetchResult<Vec<ModelIdentifier>> {
        let input = input.trim();
        if expand || is_collection_url(input) {
            return self.expand(input, authorize).await;
        }
        Ok(vec![ModelIdentifier::new(input)?])
    }

    /// Expand a collection into its model identifiers, in registry order.
    ///
    /// `authorize = true` sends the ambient credential; `false` forces a
    /// public lookup.
    pub async fn expand(&self, input: &str, authorize: bool) -> FetchResult<Vec<ModelIdentifier>> {
        let slug = extract_slug(input);
        if slug.trim().is_empty() {
            return Err(FetchError::invalid_request("collection slug cannot be empty"));
        }
        debug!(%slug, authorize, "Resolved collection slug");

        let token = if authorize {
            self.credentials.ambient()?
        } else {
            None
        };

        info!(%slug, "Fetching collection");
        let collection = self
            .provider
            .fetch_collection(&slug, token.as_deref())
            .await
            .map_err(|e| map_collection_error(&slug, e))?;
        info!(title = %collection.title, "Fetched collection");

        let ids = collection
            .model_ids()
            .into_iter()
            .filter_map(|id| ModelIdentifier::new(id).ok())
            .collect::<Vec<_>>();

        if ids.is_empty() {
            warn!(%slug, "Collection was found, but it contains no models");
        } else {
            info!(%slug, count = ids.len(), "Found models in the collection");
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use modelfetch_core::{
        Collection, CollectionItem, FileFetcher, MemoryCredentialStore, ProviderResult,
    };
    use std::path::Path;
    use std::sync::Mutex;

    struct CollectionOnlyProvider {
        result: ProviderResult<Collection>,
        seen_tokens: Mutex<Vec<Option<String>>>,
    }

    impl CollectionOnlyProvider {
        fn new(result: ProviderResult<Collection>) -> Arc<Self> {
            Arc::new(Self {
                result,
                seen_tokens: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RemoteAssetProvider for CollectionOnlyProvider {
        async fn fetch_collection(
            &self,
            _slug: &str,
            token: Option<&str>,
        ) -> ProviderResult<Collection> {
            self.seen_tokens.lock().unwrap().push(token.map(String::from));
            self.result.clone()
        }

        async fn snapshot_download(
            &self,
            _identifier: &str,
            _destination: &Path,
            _token: Option<&str>,
        ) -> ProviderResult<()> {
            Ok(())
        }

        fn file_fetcher(&self) -> Option<Arc<dyn FileFetcher>> {
            None
        }
    }

    fn collection() -> Collection {
        Collection {
            title: "Picks".to_string(),
            items: vec![
                CollectionItem::new("org/a", "model"),
                CollectionItem::new("org/ds", "dataset"),
                CollectionItem::new("org/b", "model"),
            ],
        }
    }

    fn resolver(provider: Arc<CollectionOnlyProvider>) -> IdentifierResolver {
        IdentifierResolver::new(provider, Arc::new(MemoryCredentialStore::with_token("hf_amb")))
    }

    fn http(status: u16) -> ProviderResult<Collection> {
        Err(ProviderError::Http {
            status,
            message: "https://huggingface.co/api/collections/ns/x".to_string(),
        })
    }

    #[test]
    fn test_extract_slug_from_url() {
        assert_eq!(
            extract_slug("https://huggingface.co/collections/ns/slug-1"),
            "ns/slug-1"
        );
        assert_eq!(
            extract_slug("https://host/a/b/collections/ns/slug/"),
            "ns/slug"
        );
    }

    #[test]
    fn test_extract_slug_passthrough() {
        assert_eq!(extract_slug("ns/slug"), "ns/slug");
        assert_eq!(extract_slug("https://huggingface.co/org/model"), "https://huggingface.co/org/model");
        assert_eq!(
            extract_slug("https://host/collections/ns/slug/extra"),
            "https://host/collections/ns/slug/extra"
        );
        assert_eq!(extract_slug("collections/ns/slug"), "collections/ns/slug");
    }

    #[tokio::test]
    async fn test_direct_identifier_passes_through() {
        let provider = CollectionOnlyProvider::new(Ok(collection()));
        let ids = resolver(provider.clone()).resolve(" org/model ", false, true).await.unwrap();
        assert_eq!(ids, vec![ModelIdentifier::new("org/model").unwrap()]);
        assert!(provider.seen_tokens.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_url_expands_and_keeps_models_only() {
        let provider = CollectionOnlyProvider::new(Ok(collection()));
        let ids = resolver(provider)
            .resolve("https://huggingface.co/collections/ns/picks", false, true)
            .await
            .unwrap();
        let ids: Vec<&str> = ids.iter().map(ModelIdentifier::as_str).collect();
        assert_eq!(ids, vec!["org/a", "org/b"]);
    }

    #[tokio::test]
    async fn test_authorize_controls_token() {
        let provider = CollectionOnlyProvider::new(Ok(collection()));
        let resolver = resolver(provider.clone());
        resolver.expand("ns/picks", true).await.unwrap();
        resolver.expand("ns/picks", false).await.unwrap();
        assert_eq!(
            *provider.seen_tokens.lock().unwrap(),
            vec![Some("hf_amb".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let provider = CollectionOnlyProvider::new(Ok(Collection::default()));
        let ids = resolver(provider).expand("ns/empty", true).await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_error_taxonomy() {
        let unauthorized = resolver(CollectionOnlyProvider::new(http(401)))
            .expand("ns/private", true)
            .await
            .unwrap_err();
        assert_eq!(unauthorized, FetchError::Unauthorized { slug: "ns/private".to_string() });
        assert!(unauthorized.to_string().contains("private collection"));

        let not_found = resolver(CollectionOnlyProvider::new(http(404)))
            .expand("ns/gone", true)
            .await
            .unwrap_err();
        assert!(matches!(not_found, FetchError::NotFound { .. }));

        let transport = resolver(CollectionOnlyProvider::new(http(503)))
            .expand("ns/x", true)
            .await
            .unwrap_err();
        assert!(matches!(transport, FetchError::Transport { status: Some(503), .. }));

        let unexpected = resolver(CollectionOnlyProvider::new(Err(ProviderError::InvalidResponse {
            message: "bad json".to_string(),
        })))
        .expand("ns/x", true)
        .await
        .unwrap_err();
        assert!(matches!(unexpected, FetchError::Unexpected { .. }));
    }
}
