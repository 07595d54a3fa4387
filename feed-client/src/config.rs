//! Feed configuration.

use feed_core::RetryPolicy;
use feed_types::SortParams;

use crate::snapshot::SNAPSHOT_KEY;

/// Records requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 40;

/// Configuration for [`ImageFeed`](crate::ImageFeed).
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Remote collection (event) to browse.
    pub collection_id: String,
    /// Records requested per page.
    pub page_size: u32,
    /// Retry behavior for each page fetch.
    pub retry: RetryPolicy,
    /// Initial sort order.
    pub sort: SortParams,
    /// Store key for the last-known-good snapshot.
    pub snapshot_key: String,
}

impl FeedConfig {
    /// Configuration for `collection_id` with defaults everywhere else.
    pub fn new(collection_id: &str) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
            sort: SortParams::default(),
            snapshot_key: SNAPSHOT_KEY.to_string(),
        }
    }

    /// Set the page size (at least 1).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the initial sort order.
    pub fn with_sort(mut self, sort: SortParams) -> Self {
        self.sort = sort;
        self
    }

    /// Set the snapshot store key.
    pub fn with_snapshot_key(mut self, key: &str) -> Self {
        self.snapshot_key = key.to_string();
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::{SortDirection, SortField};
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = FeedConfig::new("154770");

        assert_eq!(config.collection_id, "154770");
        assert_eq!(config.page_size, 40);
        assert_eq!(config.retry.max_attempts(), 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(1000));
        assert_eq!(config.sort, SortParams::default());
        assert_eq!(config.snapshot_key, "cachedImages");
    }

    #[test]
    fn builder_overrides() {
        let sort = SortParams::new(SortField::Name, SortDirection::Descending);
        let config = FeedConfig::new("1")
            .with_page_size(10)
            .with_retry(RetryPolicy::no_retry())
            .with_sort(sort)
            .with_snapshot_key("other");

        assert_eq!(config.page_size, 10);
        assert_eq!(config.retry.max_attempts(), 1);
        assert_eq!(config.sort, sort);
        assert_eq!(config.snapshot_key, "other");
    }

    #[test]
    fn page_size_never_zero() {
        assert_eq!(FeedConfig::new("1").with_page_size(0).page_size, 1);
    }
}
