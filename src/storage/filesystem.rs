//! Local filesystem storage backend.
//!
//! Objects live as plain files under a root directory, with the object key used as
//! the relative path. Filesystems carry no content-type metadata, so the content type
//! is derived from the key's extension.

use crate::http::mime;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::{ObjectStore, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Local filesystem object store.
#[derive(Debug)]
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Open a filesystem backend rooted at `root`.
    ///
    /// The root must already exist: the gateway never writes to the store, so an
    /// absent root is a configuration mistake rather than something to create.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        let meta = fs::metadata(&root).await.map_err(|e| {
            StorageError::Config(format!(
                "storage root '{}' is not accessible: {e}",
                root.display()
            ))
        })?;
        if !meta.is_dir() {
            return Err(StorageError::Config(format!(
                "storage root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Map a key to a path under the root, rejecting anything that could escape it.
    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let all_normal = Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !all_normal {
            return Err(StorageError::InvalidKey(format!(
                "contains unsafe path component: {key}"
            )));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for FilesystemBackend {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        let path = self.key_path(key)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime::content_type_for_extension)
            .map(ToString::to_string);

        Ok(StoredObject {
            data: Bytes::from(data),
            content_type,
        })
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn health_check(&self) -> StorageResult<()> {
        fs::metadata(&self.root).await?;
        Ok(())
    }
}
