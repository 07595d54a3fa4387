//! Persistent key-value storage.
//!
//! The feed keeps two values in one store: the last-known-good snapshot
//! and the favorites id list. Both are JSON strings under fixed keys.
//!
//! Implementations:
//! - [`MemoryStore`]: in-process map with failure injection, for tests
//! - [`FileStore`]: one file per key under a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The key cannot be used by this backend.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// String-keyed persistent storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value.
    ///
    /// Returns `Ok(true)` if removed, `Ok(false)` if not found.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;
}
