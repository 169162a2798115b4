//! Gateway error types.

use crate::http::{apply_cors, build_text_response};
use crate::storage::StorageError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Why a request could not be served from a blob.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("tenant not found: {0}")]
    TenantNotFound(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    /// A manifest entry points at a key the store does not have.
    #[error("blob missing from storage: {0}")]
    BlobMissing(String),

    /// The blob's length disagrees with the manifest's recorded size.
    #[error("blob {key} is {actual} bytes, manifest says {expected}")]
    BlobSizeMismatch {
        key: String,
        expected: u64,
        actual: u64,
    },

    /// The storage key or stored content type cannot be sent as a header.
    #[error("blob {key} has metadata that is not a valid header value: {source}")]
    InvalidBlobMetadata {
        key: String,
        source: hyper::http::Error,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl GatewayError {
    /// Get the HTTP status code for this error.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::TenantNotFound(_) | Self::PathNotFound(_) => StatusCode::NOT_FOUND,
            Self::BlobMissing(_)
            | Self::BlobSizeMismatch { .. }
            | Self::InvalidBlobMetadata { .. }
            | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client.
    ///
    /// Storage details stay in the logs; the client only learns the category.
    pub fn public_message(&self) -> String {
        match self {
            Self::TenantNotFound(tenant) => format!("Tenant not found: {tenant}"),
            Self::PathNotFound(_) => "Not found".to_string(),
            Self::BlobMissing(_) => "Blob missing from storage".to_string(),
            Self::BlobSizeMismatch { .. } | Self::InvalidBlobMetadata { .. } => {
                "Blob inconsistent with manifest".to_string()
            }
            Self::Storage(_) => "Storage error".to_string(),
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut resp = build_text_response(self.status_code(), &self.public_message());
        apply_cors(&mut resp);
        resp
    }
}
