//! Object storage abstraction and backends.
//!
//! The gateway only ever reads from the store:
//! - `manifests/{tenant}.json` for tenant manifests
//! - `blobs/{key}` for content-addressed payloads
//!
//! Backends: local filesystem and S3-compatible.

pub mod error;
pub mod filesystem;
#[cfg(test)]
pub mod memory;
pub mod s3;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use filesystem::FilesystemBackend;
pub use s3::S3Backend;
pub use traits::{ObjectStore, StoredObject};

use crate::config::StorageConfig;
use std::sync::Arc;

/// Create an object store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            prefix,
            access_key_id,
            secret_access_key,
            force_path_style,
        } => {
            let backend = S3Backend::new(
                bucket,
                endpoint.clone(),
                region.clone(),
                prefix.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
                *force_path_style,
            )
            .await?;
            Ok(Arc::new(backend))
        }
    }
}
