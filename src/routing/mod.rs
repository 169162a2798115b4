//! Routing module
//!
//! Turns a request's host and path into a tenant and a tenant-relative path.

mod tenant;
mod vhost;

pub use tenant::{parse_preview_path, route_request, Tenant, TenantRoute};
pub use vhost::{host_matches, strip_port};
