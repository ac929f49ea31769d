//! HTTP backend abstraction for the hub API.
//!
//! The production implementation uses reqwest with automatic retry for
//! transient errors. Tests inject [`testing::FakeBackend`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::HubClientConfig;
use crate::error::{HubError, HubResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    ///
    /// `token` is sent as a bearer credential when present.
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> HubResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors. Client errors (4xx) fail immediately.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &HubClientConfig) -> HubResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    fn build_request(&self, url: &Url, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> HubResult<reqwest::Response> {
        let mut last_error: Option<HubError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base_delay, attempt);
                debug!(attempt, ?delay, url = %url, "Retrying hub request");
                tokio::time::sleep(delay).await;
            }

            match self.build_request(url, token).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(HubError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(HubError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| HubError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> HubResult<T> {
        let response = self.fetch_with_retry(url, token).await?;
        let data: T = response.json().await?;
        Ok(data)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


/// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`, saturating.
fn backoff_delay(base: Duration, attempt: u8) -> Duration {
    let factor = 2u32
        .checked_pow(u32::from(attempt.saturating_sub(1)))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}
