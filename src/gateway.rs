//! Gateway instance
//!
//! Owns the site domains, the object store and the manifest cache. One instance is
//! built at startup and shared by every request handler; tests build their own with
//! an empty cache.

use crate::config::SitesConfig;
use crate::error::GatewayError;
use crate::manifest::{self, Entry, ManifestCache};
use crate::routing::{self, TenantRoute};
use crate::storage::{ObjectStore, StorageError, StoredObject};
use std::sync::Arc;

pub struct Gateway {
    sites: SitesConfig,
    store: Arc<dyn ObjectStore>,
    manifests: ManifestCache,
}

impl Gateway {
    pub fn new(sites: SitesConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            sites,
            manifests: ManifestCache::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Map a request host and path to a tenant route
    pub fn route(&self, host: &str, path: &str) -> TenantRoute {
        routing::route_request(host, path, &self.sites)
    }

    /// Find the manifest entry serving a routed request
    pub async fn resolve(&self, route: &TenantRoute) -> Result<Entry, GatewayError> {
        let manifest = self
            .manifests
            .get(&route.tenant)
            .await?
            .ok_or_else(|| GatewayError::TenantNotFound(route.tenant.name()))?;

        manifest::resolve(&manifest, &route.path)
            .cloned()
            .ok_or_else(|| GatewayError::PathNotFound(route.path.clone()))
    }

    /// Fetch the blob behind an entry
    ///
    /// The manifest vouches for the key, so an absent object is a publishing fault
    /// and reported as [`GatewayError::BlobMissing`] rather than a 404.
    pub async fn fetch_blob(&self, entry: &Entry) -> Result<StoredObject, GatewayError> {
        self.store.get(&entry.storage_key).await.map_err(|e| match e {
            StorageError::NotFound(key) => GatewayError::BlobMissing(key),
            other => GatewayError::Storage(other),
        })
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("sites", &self.sites)
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}
