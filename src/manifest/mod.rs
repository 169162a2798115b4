//! Tenant manifests: wire types, the TTL cache in front of the store, and the
//! ordered path search that turns a request path into an entry.

pub mod cache;
pub mod resolver;
pub mod types;

pub use cache::{ManifestCache, MANIFEST_TTL};
pub use resolver::resolve;
pub use types::{Entry, Manifest};
