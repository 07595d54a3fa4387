//! Favorites: a persisted set of image ids.
//!
//! Stored under [`FAVORITES_KEY`] as a JSON array of numeric ids in
//! insertion order. Favorites are independent of the feed: marking an id
//! never touches the list, and ids outlive the records they point at.

use std::collections::HashSet;
use std::sync::Arc;

use feed_types::{ImageId, ImageRecord};
use thiserror::Error;
use tracing::debug;

use crate::store::{KeyValueStore, StoreError};

/// Store key holding the favorite ids.
pub const FAVORITES_KEY: &str = "favorites";

/// Favorites errors.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored value is not an id list.
    #[error("favorites value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persisted favorite ids.
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl FavoritesStore {
    /// Favorites under the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, FAVORITES_KEY)
    }

    /// Favorites under a custom key.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// All favorite ids, oldest first, without duplicates.
    pub async fn ids(&self) -> Result<Vec<ImageId>, FavoritesError> {
        let ids: Vec<ImageId> = match self.store.get(&self.key).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let mut seen = HashSet::with_capacity(ids.len());
        Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    /// Whether `id` is a favorite.
    pub async fn contains(&self, id: ImageId) -> Result<bool, FavoritesError> {
        Ok(self.ids().await?.contains(&id))
    }

    /// Mark `id` as favorite. Returns `false` if it already was.
    pub async fn add(&self, id: ImageId) -> Result<bool, FavoritesError> {
        let mut ids = self.ids().await?;
        if ids.contains(&id) {
            return Ok(false);
        }
        ids.push(id);
        self.write(&ids).await?;
        debug!(%id, "added favorite");
        Ok(true)
    }

    /// Unmark `id`. Returns `false` if it was not a favorite.
    pub async fn remove(&self, id: ImageId) -> Result<bool, FavoritesError> {
        let mut ids = self.ids().await?;
        let before = ids.len();
        ids.retain(|existing| *existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.write(&ids).await?;
        debug!(%id, "removed favorite");
        Ok(true)
    }

    /// Flip membership. Returns the new membership.
    pub async fn toggle(&self, id: ImageId) -> Result<bool, FavoritesError> {
        if self.contains(id).await? {
            self.remove(id).await?;
            Ok(false)
        } else {
            self.add(id).await?;
            Ok(true)
        }
    }

    /// The records among `records` that are favorites, in their given order.
    pub async fn filter(&self, records: &[ImageRecord]) -> Result<Vec<ImageRecord>, FavoritesError> {
        let ids: HashSet<ImageId> = self.ids().await?.into_iter().collect();
        Ok(records
            .iter()
            .filter(|record| ids.contains(&record.id))
            .cloned()
            .collect())
    }

    async fn write(&self, ids: &[ImageId]) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(ids)?;
        self.store.set(&self.key, &raw).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").field("key", &self.key).finish()
    }
}
