//! HTTP response building module
//!
//! Builders for every status the gateway emits. None of them panic. The blob and
//! 304 builders carry store-provided header values, so they hand builder errors
//! back to the caller; the fixed-content builders log the error and fall back to a
//! bare response with the intended status.

use super::cache::CachePolicy;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use hyper::{Response, StatusCode};

/// Build 200 response for a blob
///
/// `Content-Length` is the manifest's recorded size, not `data.len()`, so HEAD
/// responses advertise the same length as GET without carrying the body.
/// Fails when the storage key or content type is not a valid header value.
pub fn build_blob_response(
    data: Bytes,
    content_type: &str,
    storage_key: &str,
    byte_size: u64,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, byte_size)
        .header(ETAG, storage_key)
        .header(
            CACHE_CONTROL,
            CachePolicy::for_content_type(content_type).to_header_value(),
        )
        .body(Full::new(body))
}

/// Build 304 Not Modified response
pub fn build_304_response(storage_key: &str) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, storage_key)
        .body(Full::new(Bytes::new()))
}

/// Build a plain-text response, used for every error status
pub fn build_text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = Bytes::from(message.to_string());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, body.len())
        .header(CACHE_CONTROL, "no-store")
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static(super::cors::ALLOW_METHODS));
    resp
}

/// Build health check response
pub fn build_health_response(healthy: bool) -> Response<Full<Bytes>> {
    if healthy {
        build_text_response(StatusCode::OK, "ok")
    } else {
        build_text_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

/// Strip the body from a response for HEAD requests, keeping status and headers
pub fn strip_body(resp: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (parts, _) = resp.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

fn fallback(status: StatusCode, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    tracing::error!(%status, error = %error, "Failed to build response");
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}
