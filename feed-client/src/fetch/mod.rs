//! Remote page fetching.
//!
//! This module provides a pluggable fetch layer that abstracts how a page
//! of records reaches the client (HTTP, mock for testing).
//!
//! # Design
//!
//! One call is one attempt: retries are layered on top by
//! [`retry_with_backoff`](crate::retry::retry_with_backoff). Every call
//! receives the request's [`CancellationToken`]; implementations should stop
//! as soon as it fires and report [`FetchError::Cancelled`].
//!
//! # Example
//!
//! ```ignore
//! let fetcher = MockFetcher::new();
//! fetcher.queue_page(records);
//! let envelope = fetcher.fetch_page(&request, &CancellationToken::new()).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpFetcher, HttpFetcherConfig};
pub use mock::MockFetcher;

use async_trait::async_trait;
use feed_types::{PageEnvelope, PageRequest};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::retry::Retryable;

/// Fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request was cancelled before it resolved.
    #[error("request cancelled")]
    Cancelled,

    /// The service answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not a page envelope.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The service answered with `ok: false`.
    #[error("failed to fetch images")]
    Rejected,
}

impl FetchError {
    /// Whether this error is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl Retryable for FetchError {
    fn is_cancellation(&self) -> bool {
        self.is_cancelled()
    }

    fn cancellation() -> Self {
        FetchError::Cancelled
    }
}

/// Source of pages of remote records.
///
/// Implementations handle the underlying transport
/// (HTTP, mock, etc).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page.
    ///
    /// Non-2xx responses and transport failures are errors. An envelope with
    /// `ok == false` is returned as-is; judging it is up to the caller.
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> Result<PageEnvelope, FetchError>;
}
