//! HttpFetcher - real page fetching over HTTP(S).
//!
//! Issues `GET endpoint?event_id&page&page_size&key&order_by&order_asc`
//! with reqwest and decodes the JSON envelope.

use super::{FetchError, PageFetcher};
use async_trait::async_trait;
use feed_types::{PageEnvelope, PageRequest};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Configuration for HttpFetcher.
#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HttpFetcher implements the PageFetcher trait over reqwest.
///
/// # Example
///
/// ```ignore
/// let fetcher = HttpFetcher::new("https://openapi.example/open/event/image-list", Some("4030"))?;
/// let envelope = fetcher.fetch_page(&request, &token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher with default timeouts.
    pub fn new(endpoint: &str, api_key: Option<&str>) -> Result<Self, FetchError> {
        Self::with_config(endpoint, api_key, HttpFetcherConfig::default())
    }

    /// Create a fetcher with custom timeouts.
    pub fn with_config(
        endpoint: &str,
        api_key: Option<&str>,
        config: HttpFetcherConfig,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.map(str::to_string),
        })
    }

    /// Endpoint pages are requested from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut query = request.query_pairs();
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }
        query
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> Result<PageEnvelope, FetchError> {
        debug!(page = request.page, endpoint = %self.endpoint, "requesting page");

        let send = self
            .client
            .get(&self.endpoint)
            .query(&self.query(request))
            .send();

        // Dropping the in-flight future aborts the transfer.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = send => response?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            body = response.bytes() => body?,
        };

        PageEnvelope::from_json(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
