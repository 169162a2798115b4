//! Object store trait.

use crate::storage::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// An object fetched from the store together with its metadata.
#[derive(Clone, Debug)]
pub struct StoredObject {
    /// Object payload.
    pub data: Bytes,
    /// Content type recorded alongside the object, if the backend has one.
    pub content_type: Option<String>,
}

/// Read-only object store consumed by the gateway.
///
/// Both manifests (`manifests/{tenant}.json`) and blobs (`blobs/{key}`) are read
/// through this trait. A missing object must surface as
/// [`StorageError::NotFound`](crate::storage::StorageError::NotFound) so callers can
/// tell absence apart from transport failures.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetch an object's content and metadata.
    async fn get(&self, key: &str) -> StorageResult<StoredObject>;

    /// Static identifier of the backend type (e.g. "s3", "filesystem").
    fn backend_name(&self) -> &'static str;

    /// Verify the backend is reachable. Used by the readiness probe.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
