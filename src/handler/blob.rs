//! Blob serving module
//!
//! Turns a resolved manifest entry into a response: conditional short-circuit,
//! blob fetch, content type and cache headers.

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::http::{self, cache, mime};
use crate::manifest::Entry;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve the blob behind `entry`
///
/// A validator equal to the entry's storage key answers 304 without touching the
/// store: the key names the content, so it can never be stale.
pub async fn serve_entry(
    gateway: &Gateway,
    entry: &Entry,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, GatewayError> {
    let invalid_metadata = |source| GatewayError::InvalidBlobMetadata {
        key: entry.storage_key.clone(),
        source,
    };

    if cache::validator_matches(if_none_match, &entry.storage_key) {
        return http::build_304_response(&entry.storage_key).map_err(invalid_metadata);
    }

    let object = gateway.fetch_blob(entry).await?;

    // Content-Length comes from the manifest; hyper refuses a body of another length
    let actual = u64::try_from(object.data.len()).unwrap_or(u64::MAX);
    if actual != entry.byte_size {
        return Err(GatewayError::BlobSizeMismatch {
            key: entry.storage_key.clone(),
            expected: entry.byte_size,
            actual,
        });
    }

    let content_type = object
        .content_type
        .as_deref()
        .unwrap_or(mime::DEFAULT_CONTENT_TYPE);

    http::build_blob_response(
        object.data,
        content_type,
        &entry.storage_key,
        entry.byte_size,
        is_head,
    )
    .map_err(invalid_metadata)
}
