//! Request handler module
//!
//! Dispatches each request through tenant routing and manifest resolution to the
//! blob it names.

pub mod blob;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
