//! Process-lifetime manifest cache.
//!
//! Each tenant's manifest is fetched from the store on first use and then served
//! from memory for [`MANIFEST_TTL`]. A republished manifest therefore becomes
//! visible within one TTL. Absent or malformed manifests are never cached.
//!
//! Concurrent misses for the same tenant may each fetch; the later write simply
//! replaces the earlier one with an equal or newer manifest. The map lock is only
//! held for the lookup and the insert, never across the store call.

use super::types::Manifest;
use crate::routing::Tenant;
use crate::storage::{ObjectStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How long a fetched manifest is served without re-reading the store.
pub const MANIFEST_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CacheRecord {
    manifest: Arc<Manifest>,
    expires_at: Instant,
}

/// TTL cache of tenant manifests, fronting the object store.
pub struct ManifestCache {
    store: Arc<dyn ObjectStore>,
    records: RwLock<HashMap<String, CacheRecord>>,
}

impl ManifestCache {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Get a tenant's manifest.
    ///
    /// Returns `Ok(None)` when the tenant has no manifest or it does not parse.
    /// Other store failures propagate.
    pub async fn get(&self, tenant: &Tenant) -> StorageResult<Option<Arc<Manifest>>> {
        let name = tenant.name();

        if let Some(manifest) = self.lookup(&name).await {
            tracing::debug!(tenant = %name, "manifest cache hit");
            return Ok(Some(manifest));
        }

        tracing::debug!(tenant = %name, "manifest cache miss");
        match self.fetch(tenant).await? {
            Some(manifest) => {
                let manifest = Arc::new(manifest);
                let record = CacheRecord {
                    manifest: Arc::clone(&manifest),
                    expires_at: Instant::now() + MANIFEST_TTL,
                };
                self.records.write().await.insert(name.clone(), record);
                tracing::debug!(tenant = %name, entries = manifest.len(), "manifest cached");
                Ok(Some(manifest))
            }
            None => {
                // Drop an expired record so the map does not keep deleted tenants.
                self.records.write().await.remove(&name);
                Ok(None)
            }
        }
    }

    /// Number of records held, expired ones included.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    async fn lookup(&self, name: &str) -> Option<Arc<Manifest>> {
        let records = self.records.read().await;
        records
            .get(name)
            .filter(|record| Instant::now() < record.expires_at)
            .map(|record| Arc::clone(&record.manifest))
    }

    async fn fetch(&self, tenant: &Tenant) -> StorageResult<Option<Manifest>> {
        let key = tenant.manifest_key();
        let object = match self.store.get(&key).await {
            Ok(object) => object,
            Err(StorageError::NotFound(_)) => {
                tracing::debug!(tenant = %tenant, key = %key, "manifest not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match Manifest::from_json(&object.data) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(e) => {
                tracing::warn!(tenant = %tenant, key = %key, error = %e, "malformed manifest");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for ManifestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestCache")
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}
