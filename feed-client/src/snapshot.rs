//! Last-known-good snapshot of the list.
//!
//! After every successful page the full list is written under
//! [`SNAPSHOT_KEY`] as a JSON array of records. The snapshot is only read
//! back when a refresh starts offline with nothing on screen.

use std::sync::Arc;

use feed_types::ImageRecord;
use thiserror::Error;

use crate::store::{KeyValueStore, StoreError};

/// Store key holding the cached list.
pub const SNAPSHOT_KEY: &str = "cachedImages";

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored value is not a record list.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Reads and writes the cached list.
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SnapshotCache {
    /// Snapshot under the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, SNAPSHOT_KEY)
    }

    /// Snapshot under a custom key.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Key the snapshot lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the cached list. `Ok(None)` when nothing was ever saved.
    pub async fn load(&self) -> Result<Option<Vec<ImageRecord>>, SnapshotError> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the cached list.
    pub async fn save(&self, records: &[ImageRecord]) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&self.key, &raw).await?;
        Ok(())
    }

    /// Drop the cached list. Returns whether one existed.
    pub async fn clear(&self) -> Result<bool, SnapshotError> {
        Ok(self.store.remove(&self.key).await?)
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache").field("key", &self.key).finish()
    }
}
