// Application state module
// Shared by every connection for the lifetime of the process

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::gateway::Gateway;
use crate::logger::AccessLogFormat;
use crate::storage::ObjectStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
    /// Parsed once from `logging.access_log_format`
    pub access_log_format: AccessLogFormat,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        let gateway = Gateway::new(config.sites.clone(), store);
        let access_log_format = AccessLogFormat::parse(&config.logging.access_log_format);
        Self {
            config,
            gateway,
            access_log_format,
            active_connections: AtomicUsize::new(0),
        }
    }
}
