// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    SitesConfig, StorageConfig,
};

/// Default config file name, looked up without extension
const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the path given as the first CLI argument
    /// Falls back to "config" (e.g. config.toml) when no path is given
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the file (optional),
    /// `GATEWAY_*` environment variables with `__` between nested keys.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("GATEWAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "blob-gateway")?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate().map_err(config::ConfigError::Message)?;
        Ok(config)
    }

    /// Reject configurations that would route or store incorrectly
    pub fn validate(&self) -> Result<(), String> {
        let sites = &self.sites;
        if sites.production_domain.trim().is_empty() {
            return Err("sites.production_domain must not be empty".to_string());
        }
        if sites.staging_domain.trim().is_empty() {
            return Err("sites.staging_domain must not be empty".to_string());
        }
        if sites
            .production_domain
            .eq_ignore_ascii_case(&sites.staging_domain)
        {
            return Err("sites.production_domain and sites.staging_domain must differ".to_string());
        }

        if let StorageConfig::S3 {
            bucket,
            access_key_id,
            secret_access_key,
            ..
        } = &self.storage
        {
            if bucket.is_empty() {
                return Err("storage.bucket must not be empty".to_string());
            }
            if access_key_id.is_some() != secret_access_key.is_some() {
                return Err(
                    "storage.access_key_id and storage.secret_access_key must be set together"
                        .to_string(),
                );
            }
        }

        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[sites]
production_domain = "notebooks.example.org"
staging_domain = "staging.notebooks.example.org"

[storage]
backend = "filesystem"
path = "/srv/site"
"#;

    fn load_toml(contents: &str) -> Result<Config, config::ConfigError> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gateway.toml"), contents).unwrap();
        // File::with_name resolves the extension itself
        Config::load_from(dir.path().join("gateway").to_str().unwrap())
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = load_toml(MINIMAL).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
        assert_eq!(cfg.http.server_name, "blob-gateway");
        assert!(!cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
        assert_eq!(
            cfg.storage,
            StorageConfig::Filesystem {
                path: "/srv/site".into()
            }
        );
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_s3_storage_section() {
        let cfg = load_toml(
            r#"
[sites]
production_domain = "a.example"
staging_domain = "b.example"

[storage]
backend = "s3"
bucket = "site-content"
endpoint = "minio:9000"
force_path_style = true
"#,
        )
        .unwrap();
        match cfg.storage {
            StorageConfig::S3 {
                bucket,
                endpoint,
                force_path_style,
                access_key_id,
                ..
            } => {
                assert_eq!(bucket, "site-content");
                assert_eq!(endpoint.as_deref(), Some("minio:9000"));
                assert!(force_path_style);
                assert!(access_key_id.is_none());
            }
            other @ StorageConfig::Filesystem { .. } => panic!("unexpected storage {other:?}"),
        }
    }

    #[test]
    fn test_equal_domains_rejected() {
        let result = load_toml(
            r#"
[sites]
production_domain = "same.example"
staging_domain = "SAME.example"

[storage]
backend = "filesystem"
path = "/srv/site"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let result = load_toml(
            r#"
[sites]
production_domain = "a.example"
staging_domain = "b.example"

[storage]
backend = "s3"
bucket = "site-content"
access_key_id = "AKIA"
"#,
        );
        assert!(result.is_err());
    }
}
