//! Configuration schema
//!
//! Mirrors the TOML layout section by section. Defaults for required scalar keys
//! are registered on the loader in `config::mod`; optional sections default here.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub sites: SitesConfig,
    #[serde(default)]
    pub health: HealthConfig,
    pub storage: StorageConfig,
}

/// Listen address and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; one per core when unset
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a `$variable` pattern
    pub access_log_format: String,
}

/// Connection limits, all durations in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Longest wait for the next request's headers on an open connection,
    /// idle keep-alive included; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Sent as the `Server` header
    pub server_name: String,
}

/// Site domains used for tenant routing
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SitesConfig {
    /// Host serving the production tenant
    pub production_domain: String,
    /// Host serving previews under `/pr-{N}`
    pub staging_domain: String,
}

/// Liveness and readiness probes
///
/// Off by default: a probe path shadows the tenant path of the same name.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub liveness_path: String,
    /// Answers 503 while the object store is unreachable
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            liveness_path: "/healthz".to_string(),
            readiness_path: "/readyz".to_string(),
        }
    }
}

/// Object store binding
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Objects stored as files under `path`
    Filesystem { path: PathBuf },
    /// S3 or an S3-compatible service
    S3 {
        bucket: String,
        endpoint: Option<String>,
        region: Option<String>,
        /// Key prefix inside the bucket
        prefix: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        #[serde(default)]
        force_path_style: bool,
    },
}

impl StorageConfig {
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "filesystem",
            Self::S3 { .. } => "s3",
        }
    }
}
