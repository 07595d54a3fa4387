//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{KeyValueStore, StoreError};

/// In-memory store for testing.
///
/// Not persistent: all data is lost when the last clone is dropped.
/// Clones share state. Supports one-shot failure injection on reads and
/// writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: HashMap<String, String>,
    fail_next_get: Option<String>,
    fail_next_set: Option<String>,
    delay_next_set: Option<Duration>,
    writes: usize,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `get` fail.
    pub fn fail_next_get(&self, message: &str) {
        self.inner.lock().fail_next_get = Some(message.to_string());
    }

    /// Make the next `set` fail.
    pub fn fail_next_set(&self, message: &str) {
        self.inner.lock().fail_next_set = Some(message.to_string());
    }

    /// Make the next `set` wait for `delay` before writing.
    pub fn delay_next_set(&self, delay: Duration) {
        self.inner.lock().delay_next_set = Some(delay);
    }

    /// Number of successful `set` calls.
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }

    /// Get the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }

    /// Clear all values from the store.
    pub fn clear(&self) {
        self.inner.lock().values.clear();
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(message) = inner.fail_next_get.take() {
            return Err(StoreError::Backend(message));
        }
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let delay = self.inner.lock().delay_next_set.take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock();
        if let Some(message) = inner.fail_next_set.take() {
            return Err(StoreError::Backend(message));
        }
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().values.remove(key).is_some())
    }
}
