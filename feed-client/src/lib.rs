//! # feed-client
//!
//! Client library for the gallery feed.
//!
//! This is the library presentation layers use to browse a remote image
//! collection.
//!
//! ## Features
//!
//! - **Paginated sync**: refresh page 0, append further pages, de-duplicated by id
//! - **Retry with backoff**: bounded exponential backoff, cancellation-aware
//! - **Offline fallback**: last-known-good snapshot in a key-value store
//! - **Race-free state**: stale results never touch the list
//! - **Favorites**: persisted id set sharing the same store
//!
//! ## Example
//!
//! ```ignore
//! use feed_client::{FeedConfig, HttpFetcher, ImageFeed, ManualConnectivity, MemoryStore};
//!
//! let fetcher = HttpFetcher::new("https://api.example/image-list", Some("key"))?;
//! let feed = ImageFeed::new(
//!     FeedConfig::new("154770"),
//!     fetcher,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(ManualConnectivity::online()),
//! );
//!
//! feed.refresh().await;
//! feed.load_more().await;
//! let view = feed.snapshot();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connectivity;
pub mod favorites;
pub mod feed;
pub mod fetch;
pub mod retry;
pub mod snapshot;
pub mod store;

pub use config::FeedConfig;
pub use connectivity::{Connectivity, HttpProbe, ManualConnectivity, NetworkStatus};
pub use favorites::{FavoritesError, FavoritesStore, FAVORITES_KEY};
pub use feed::ImageFeed;
pub use fetch::{FetchError, HttpFetcher, MockFetcher, PageFetcher};
pub use retry::{retry_with_backoff, Retryable};
pub use snapshot::{SnapshotCache, SnapshotError, SNAPSHOT_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub use feed_core::{FeedSnapshot, LoadError, RetryPolicy};
pub use tokio_util::sync::CancellationToken;
