//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from manifest
//! resolution: cache policy, content types, CORS and response builders.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use cors::{apply_cors, build_preflight_response};
pub use response::{
    build_304_response, build_405_response, build_blob_response, build_health_response,
    build_text_response, strip_body,
};
