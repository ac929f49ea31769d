//! Collection lookups against the hub API.

use modelfetch_core::{Collection, CollectionItem};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::HubResult;
use crate::http::HttpBackend;

/// Wire shape of `GET /api/collections/{slug}`.
#[derive(Debug, Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    items: Vec<CollectionItemResponse>,
}

#[derive(Debug, Deserialize)]
struct CollectionItemResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default)]
    item_type: String,
}

impl From<CollectionResponse> for Collection {
    fn from(response: CollectionResponse) -> Self {
        let items = response
            .items
            .into_iter()
            .filter_map(|item| item.id.map(|id| CollectionItem::new(id, item.item_type)))
            .collect();
        Self {
            title: response.title,
            items,
        }
    }
}

/// Build the collection URL for `slug` under `endpoint`.
pub(crate) fn collection_url(endpoint: &str, slug: &str) -> HubResult<Url> {
    let url = format!(
        "{}/api/collections/{}",
        endpoint.trim_end_matches('/'),
        slug.trim_matches('/')
    );
    Ok(Url::parse(&url)?)
}

/// Client for collection lookups, generic over the HTTP backend.
pub struct CollectionClient<B: HttpBackend> {
    backend: B,
    endpoint: String,
}

impl<B: HttpBackend> CollectionClient<B> {
    pub fn new(backend: B, endpoint: impl Into<String>) -> Self {
        Self {
            backend,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch a collection. `token = None` makes a public request.
    pub async fn fetch(&self, slug: &str, token: Option<&str>) -> HubResult<Collection> {
        let url = collection_url(&self.endpoint, slug)?;
        debug!(url = %url, authorized = token.is_some(), "Fetching collection");

        let response: CollectionResponse = self.backend.get_json(&url, token).await?;
        let collection = Collection::from(response);
        info!(title = %collection.title, items = collection.items.len(), "Fetched collection");
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HubError;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    fn client(backend: FakeBackend) -> CollectionClient<FakeBackend> {
        CollectionClient::new(backend, "https://huggingface.co/")
    }

    #[test]
    fn test_collection_url() {
        let url = collection_url("https://huggingface.co/", "ns/picks-123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://huggingface.co/api/collections/ns/picks-123"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_items() {
        let backend = FakeBackend::new().with_response(
            "ns/picks",
            CannedResponse::Json(json!({
                "slug": "ns/picks-123",
                "title": "Picks",
                "items": [
                    {"_id": "1", "id": "org/model-a", "type": "model"},
                    {"_id": "2", "id": "org/data", "type": "dataset"},
                    {"_id": "3", "type": "paper"}
                ]
            })),
        );
        let client = client(backend);

        let collection = client.fetch("ns/picks-123", Some("tok")).await.unwrap();
        assert_eq!(collection.title, "Picks");
        assert_eq!(collection.items.len(), 2);
        assert_eq!(collection.model_ids(), vec!["org/model-a"]);
        assert_eq!(client.backend.requests()[0].1.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_fetch_public_sends_no_token() {
        let backend = FakeBackend::new()
            .with_response("ns/empty", CannedResponse::Json(json!({"title": "Empty", "items": []})));
        let client = client(backend);

        let collection = client.fetch("ns/empty", None).await.unwrap();
        assert!(collection.items.is_empty());
        assert_eq!(client.backend.requests()[0].1, None);
    }

    #[tokio::test]
    async fn test_fetch_propagates_status() {
        let backend = FakeBackend::new().with_response("ns/private", CannedResponse::Status(401));
        let err = client(backend).fetch("ns/private", None).await.unwrap_err();
        assert!(matches!(err, HubError::ApiRequestFailed { status: 401, .. }));
    }
}
