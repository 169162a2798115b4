//! Logger module
//!
//! Diagnostics go through `tracing`; this module installs the subscriber and
//! renders the per-request access log line.

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing target carrying access log lines
pub const ACCESS_TARGET: &str = "access";

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins over `logging.level` when set. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("blob-gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(%addr, "Listening on http://{addr}");
    tracing::info!(
        production = %config.sites.production_domain,
        staging = %config.sites.staging_domain,
        "Site domains"
    );
    tracing::info!(backend = config.storage.backend_name(), "Storage backend ready");
    match config.server.workers {
        Some(workers) => tracing::info!(workers, "Worker threads"),
        None => tracing::info!("Worker threads: one per CPU core"),
    }
    if config.logging.access_log {
        tracing::info!(format = %config.logging.access_log_format, "Access log enabled");
    }
}

/// Emit one access log line
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.render(format));
}
