//! CLI command implementations.

pub mod cache;
pub mod favorite;
pub mod refresh;
pub mod status;

use anyhow::{Context, Result};
use feed_client::{
    Connectivity, FavoritesStore, FileStore, HttpFetcher, HttpProbe, ImageFeed,
    ManualConnectivity, SnapshotCache,
};
use feed_types::{ImageRecord, SortParams};
use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;

/// Items printed per listing unless asked otherwise.
pub const PREVIEW_LIMIT: usize = 10;

/// Everything a command needs: where data lives, settings, and whether to
/// pretend the network is down.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Directory holding the store and the config file.
    pub data_dir: PathBuf,
    /// Loaded configuration.
    pub config: AppConfig,
    /// Force offline mode.
    pub offline: bool,
}

impl AppContext {
    /// Create a context.
    pub fn new(data_dir: &Path, config: AppConfig, offline: bool) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            config,
            offline,
        }
    }

    /// Store directory.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Open the persistent store.
    pub async fn store(&self) -> Result<Arc<FileStore>> {
        let store = FileStore::open(self.store_dir())
            .await
            .context("Failed to open data store")?;
        Ok(Arc::new(store))
    }

    /// Connectivity oracle: forced offline, or probing the API endpoint.
    pub fn connectivity(&self) -> Result<Arc<dyn Connectivity>> {
        if self.offline {
            return Ok(Arc::new(ManualConnectivity::offline()));
        }
        let probe = HttpProbe::new(&self.config.api.endpoint)
            .context("Failed to build connectivity probe")?;
        Ok(Arc::new(probe))
    }

    /// Build a feed over the HTTP fetcher.
    pub async fn feed(&self, sort: Option<SortParams>) -> Result<ImageFeed<HttpFetcher>> {
        let fetcher = HttpFetcher::new(
            &self.config.api.endpoint,
            self.config.api.api_key.as_deref(),
        )
        .context("Failed to build HTTP client")?;

        Ok(ImageFeed::new(
            self.config.feed_config(sort),
            fetcher,
            self.store().await?,
            self.connectivity()?,
        ))
    }

    /// Snapshot cache over the persistent store.
    pub async fn snapshots(&self) -> Result<SnapshotCache> {
        Ok(SnapshotCache::new(self.store().await?))
    }

    /// Favorites over the persistent store.
    pub async fn favorites(&self) -> Result<FavoritesStore> {
        Ok(FavoritesStore::new(self.store().await?))
    }
}

/// Print one line per record, at most `limit` of them.
pub fn print_records<R: Borrow<ImageRecord>>(records: &[R], limit: usize) {
    for record in records.iter().take(limit) {
        let record: &ImageRecord = Borrow::borrow(record);
        println!(
            "  {:>12}  {:<32}  {}x{}",
            record.id.value(),
            truncate(record.display_caption(), 32),
            record.width,
            record.height
        );
    }
    if records.len() > limit {
        println!("  ... and {} more", records.len() - limit);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
