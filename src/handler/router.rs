//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, health probes, tenant
//! routing, manifest resolution and blob serving. Every outcome becomes a response.

use crate::config::AppState;
use crate::handler::blob;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Tenant;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{HeaderValue, HOST, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();

        Self {
            method: req.method().clone(),
            // HTTP/2 requests carry the host in the URI authority instead
            host: header_string(req, HOST)
                .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
                .unwrap_or_default(),
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            version: req.version(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header_string(req, IF_NONE_MATCH),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let received_at = Local::now();
    let ctx = RequestContext::from_request(&req);

    let (mut response, tenant) = dispatch(&ctx, &state).await;

    http::apply_cors(&mut response);
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.clone(),
            received_at,
        );
        entry.query.clone_from(&ctx.query);
        entry.http_version = http_version_label(ctx.version);
        entry.status = response.status().as_u16();
        entry.bytes_sent = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_string(&req, REFERER);
        entry.user_agent = header_string(&req, USER_AGENT);
        entry.elapsed = start.elapsed();
        entry.tenant = tenant.as_ref().map(Tenant::name);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

/// Produce the response, plus the tenant when the request got as far as routing
async fn dispatch(
    ctx: &RequestContext,
    state: &AppState,
) -> (Response<Full<Bytes>>, Option<Tenant>) {
    if let Some(resp) = check_http_method(&ctx.method) {
        return (resp, None);
    }

    if let Some(resp) = check_health(ctx, state).await {
        let resp = if ctx.is_head { http::strip_body(resp) } else { resp };
        return (resp, None);
    }

    let gateway = &state.gateway;
    let route = gateway.route(&ctx.host, &ctx.path);

    let result = async {
        let entry = gateway.resolve(&route).await?;
        blob::serve_entry(gateway, &entry, ctx.if_none_match.as_deref(), ctx.is_head).await
    }
    .await;

    let response = match result {
        Ok(resp) => resp,
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(tenant = %route.tenant, path = %route.path, error = %e, "Request failed");
            } else {
                tracing::debug!(tenant = %route.tenant, path = %route.path, error = %e, "Not found");
            }
            let resp = e.into_response();
            if ctx.is_head {
                http::strip_body(resp)
            } else {
                resp
            }
        }
    };

    (response, Some(route.tenant))
}

/// Answer preflights and reject anything other than GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_preflight_response()),
        _ => {
            tracing::debug!(%method, "Method not allowed");
            Some(http::build_405_response())
        }
    }
}

/// Health probes, checked before tenant routing when enabled
async fn check_health(ctx: &RequestContext, state: &AppState) -> Option<Response<Full<Bytes>>> {
    let health = &state.config.health;
    if !health.enabled {
        return None;
    }

    if ctx.path == health.liveness_path {
        return Some(http::build_health_response(true));
    }
    if ctx.path == health.readiness_path {
        let store = state.gateway.store();
        let healthy = match store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(backend = store.backend_name(), error = %e, "Readiness check failed");
                false
            }
        };
        return Some(http::build_health_response(healthy));
    }
    None
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
