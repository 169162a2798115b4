//! Multi-tenant edge gateway serving content-addressed blobs.
//!
//! A request's host and path pick a tenant; the tenant's manifest maps the path to
//! an immutable blob in object storage, which is served with cache headers derived
//! from its content type.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod http;
pub mod logger;
pub mod manifest;
pub mod routing;
pub mod server;
pub mod storage;
