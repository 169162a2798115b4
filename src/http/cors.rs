//! CORS module
//!
//! Site assets are fetched cross-origin by notebooks and dashboards, so every
//! response is readable from any origin, failures included. A 404 without the allow
//! header would reach the caller as an opaque network error.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ALLOW,
};
use hyper::{Response, StatusCode};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, HEAD, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";
/// Preflight cache lifetime in seconds (one day)
pub const PREFLIGHT_MAX_AGE: u32 = 86_400;

/// Build the 204 answer to an OPTIONS preflight
pub fn build_preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOW_METHODS)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN)
        .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS)
        .header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS)
        .header(ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build preflight response");
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = StatusCode::NO_CONTENT;
            resp
        })
}

/// Attach the cross-origin allow header unless a builder already set it
pub fn apply_cors<B>(response: &mut Response<B>) {
    response
        .headers_mut()
        .entry(ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static(ALLOW_ORIGIN));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_headers() {
        let resp = build_preflight_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let h = resp.headers();
        assert_eq!(h[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_METHODS], "GET, HEAD, OPTIONS");
        assert!(h[ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .contains("Content-Type"));
        assert_eq!(h[ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[test]
    fn test_apply_cors_is_idempotent() {
        let mut resp = Response::new(());
        apply_cors(&mut resp);
        apply_cors(&mut resp);
        assert_eq!(resp.headers().get_all(ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
    }
}
