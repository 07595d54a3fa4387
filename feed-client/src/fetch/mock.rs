//! Mock fetcher for testing.
//!
//! Allows queueing responses and capturing requests for verification.

use super::{FetchError, PageFetcher};
use async_trait::async_trait;
use feed_types::{ImageRecord, PageEnvelope, PageRequest};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct QueuedResponse {
    result: Result<PageEnvelope, FetchError>,
    delay: Duration,
}

/// Mock fetcher for testing.
///
/// Responses are handed out in queue order, one per `fetch_page` call.
/// Clones share state, so a test can keep a handle after moving one
/// into the feed.
#[derive(Debug, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
}

#[derive(Debug, Default)]
struct MockFetcherInner {
    requests: Vec<PageRequest>,
    responses: VecDeque<QueuedResponse>,
    ignore_cancellation: bool,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page.
    pub fn queue_page(&self, records: Vec<ImageRecord>) {
        self.queue(Ok(PageEnvelope::success(records)), Duration::ZERO);
    }

    /// Queue a successful page that resolves after `delay`.
    pub fn queue_page_after(&self, records: Vec<ImageRecord>, delay: Duration) {
        self.queue(Ok(PageEnvelope::success(records)), delay);
    }

    /// Queue an envelope with `ok == false`.
    pub fn queue_rejected(&self) {
        self.queue(Ok(PageEnvelope::rejected()), Duration::ZERO);
    }

    /// Queue a failed attempt.
    pub fn queue_error(&self, error: FetchError) {
        self.queue(Err(error), Duration::ZERO);
    }

    /// Queue a failed attempt that resolves after `delay`.
    pub fn queue_error_after(&self, error: FetchError, delay: Duration) {
        self.queue(Err(error), delay);
    }

    /// Keep resolving delayed responses after their token fires.
    ///
    /// Models a transport that cannot abort an in-flight request.
    pub fn ignore_cancellation(&self) {
        let mut inner = self.inner.lock();
        inner.ignore_cancellation = true;
    }

    /// Get all requests that were made.
    pub fn requests(&self) -> Vec<PageRequest> {
        let inner = self.inner.lock();
        inner.requests.clone()
    }

    /// Number of `fetch_page` calls so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.requests.len()
    }

    /// Number of responses not yet handed out.
    pub fn pending_responses(&self) -> usize {
        let inner = self.inner.lock();
        inner.responses.len()
    }

    /// Clear all state (requests, queue, flags).
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        *inner = MockFetcherInner::default();
    }

    fn queue(&self, result: Result<PageEnvelope, FetchError>, delay: Duration) {
        let mut inner = self.inner.lock();
        inner.responses.push_back(QueuedResponse { result, delay });
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> Result<PageEnvelope, FetchError> {
        let (queued, ignore_cancellation) = {
            let mut inner = self.inner.lock();
            inner.requests.push(request.clone());
            (inner.responses.pop_front(), inner.ignore_cancellation)
        };

        let Some(QueuedResponse { result, delay }) = queued else {
            return Err(FetchError::Transport("no response queued".into()));
        };

        if ignore_cancellation {
            tokio::time::sleep(delay).await;
            return result;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            _ = tokio::time::sleep(delay) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::SortParams;

    fn request(page: u32) -> PageRequest {
        PageRequest::new("event", page, 40, SortParams::default())
    }

    // ===========================================
    // MockFetcher Basic Tests
    // ===========================================

    #[tokio::test]
    async fn returns_queued_pages_in_order() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(vec![ImageRecord::new(1, "a")]);
        fetcher.queue_page(vec![ImageRecord::new(2, "b")]);
        let token = CancellationToken::new();

        let first = fetcher.fetch_page(&request(0), &token).await.unwrap();
        let second = fetcher.fetch_page(&request(1), &token).await.unwrap();

        assert_eq!(first.records()[0].id.value(), 1);
        assert_eq!(second.records()[0].id.value(), 2);
    }

    #[tokio::test]
    async fn captures_requests() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(vec![]);
        fetcher
            .fetch_page(&request(3), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher.request_count(), 1);
        assert_eq!(fetcher.requests()[0].page, 3);
    }

    #[tokio::test]
    async fn empty_queue_is_transport_error() {
        let fetcher = MockFetcher::new();
        let result = fetcher.fetch_page(&request(0), &CancellationToken::new()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    // ===========================================
    // Error and Cancellation Tests
    // ===========================================

    #[tokio::test]
    async fn queued_error_is_returned_once() {
        let fetcher = MockFetcher::new();
        fetcher.queue_error(FetchError::Status(503));
        fetcher.queue_page(vec![]);
        let token = CancellationToken::new();

        let result = fetcher.fetch_page(&request(0), &token).await;
        assert!(matches!(result, Err(FetchError::Status(503))));

        // Next fetch should work
        assert!(fetcher.fetch_page(&request(0), &token).await.is_ok());
    }

    #[tokio::test]
    async fn rejected_envelope_is_not_an_error() {
        let fetcher = MockFetcher::new();
        fetcher.queue_rejected();

        let envelope = fetcher
            .fetch_page(&request(0), &CancellationToken::new())
            .await
            .unwrap();
        assert!(!envelope.ok);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_response_honors_cancellation() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page_after(vec![], Duration::from_secs(5));
        let token = CancellationToken::new();

        let canceller = {
            let token = token.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                token.cancel();
            }
        };
        let req = request(0);
        let (result, _) = tokio::join!(fetcher.fetch_page(&req, &token), canceller);

        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn ignore_cancellation_still_resolves() {
        let fetcher = MockFetcher::new();
        fetcher.ignore_cancellation();
        fetcher.queue_page_after(vec![ImageRecord::new(1, "a")], Duration::from_secs(1));
        let token = CancellationToken::new();
        token.cancel();

        let envelope = fetcher.fetch_page(&request(0), &token).await.unwrap();
        assert_eq!(envelope.records().len(), 1);
    }

    // ===========================================
    // Clone and Shared State Tests
    // ===========================================

    #[tokio::test]
    async fn clone_shares_state() {
        let fetcher1 = MockFetcher::new();
        let fetcher2 = fetcher1.clone();

        fetcher1.queue_page(vec![]);
        fetcher2
            .fetch_page(&request(0), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher1.request_count(), 1);
        assert_eq!(fetcher1.pending_responses(), 0);
    }

    #[tokio::test]
    async fn reset_clears_all() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(vec![]);
        fetcher.ignore_cancellation();
        fetcher
            .fetch_page(&request(0), &CancellationToken::new())
            .await
            .unwrap();

        fetcher.reset();

        assert_eq!(fetcher.request_count(), 0);
        assert_eq!(fetcher.pending_responses(), 0);
    }
}
