//! In-memory object store for tests.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::{ObjectStore, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Object store backed by a `HashMap`, counting every `get` per key.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: Mutex<HashMap<String, StoredObject>>,
    gets: Mutex<HashMap<String, usize>>,
    unhealthy: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous value under `key`.
    pub fn put(&self, key: &str, data: impl Into<Bytes>, content_type: Option<&str>) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                content_type: content_type.map(ToString::to_string),
            },
        );
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    /// Make `health_check` fail until called again with `false`.
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::Relaxed);
    }

    /// Number of `get` calls issued for `key`, hits and misses alike.
    pub fn get_count(&self, key: &str) -> usize {
        self.gets.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        *self.gets.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StorageResult<()> {
        if self.unhealthy.load(Ordering::Relaxed) {
            return Err(StorageError::Io(std::io::Error::other("store marked unhealthy")));
        }
        Ok(())
    }
}
