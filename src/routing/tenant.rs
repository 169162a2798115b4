//! Tenant routing module
//!
//! Maps `(host, path)` to the tenant whose manifest serves the request and the path
//! inside that tenant. Production serves every path as-is; the staging domain
//! addresses previews under `/pr-{N}`. Anything unrecognised falls back to
//! production, so routing never fails.

use super::vhost::host_matches;
use crate::config::SitesConfig;
use std::fmt;

/// Literal prefix of a preview path
const PREVIEW_PREFIX: &str = "/pr-";

/// An independently addressable site snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tenant {
    /// Production, named `main`
    Production,
    /// Preview for change request `N`, named `pr-{N}`. Digits are kept verbatim.
    Preview(String),
}

impl Tenant {
    /// Name used for the manifest key and in logs
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Object key of this tenant's manifest
    pub fn manifest_key(&self) -> String {
        format!("manifests/{}.json", self.name())
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("main"),
            Self::Preview(number) => write!(f, "pr-{number}"),
        }
    }
}

/// Result of routing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRoute {
    pub tenant: Tenant,
    /// Path relative to the tenant, always starting with `/`
    pub path: String,
}

/// Route a request to its tenant
pub fn route_request(host: &str, path: &str, sites: &SitesConfig) -> TenantRoute {
    if host_matches(&sites.production_domain, host) {
        return production(path);
    }

    if host_matches(&sites.staging_domain, host) {
        if let Some((number, rest)) = parse_preview_path(path) {
            return TenantRoute {
                tenant: Tenant::Preview(number.to_string()),
                path: if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                },
            };
        }
    }

    production(path)
}

fn production(path: &str) -> TenantRoute {
    TenantRoute {
        tenant: Tenant::Production,
        path: path.to_string(),
    }
}

/// Parse `/pr-{digits}` optionally followed by `/{rest}`
///
/// Returns the digit run and the remainder (empty, or starting with `/`).
/// Rejects an empty digit run and digits followed by anything but `/`.
pub fn parse_preview_path(path: &str) -> Option<(&str, &str)> {
    let after_prefix = path.strip_prefix(PREVIEW_PREFIX)?;
    let digits_len = after_prefix
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }

    let (digits, rest) = after_prefix.split_at(digits_len);
    if rest.is_empty() || rest.starts_with('/') {
        Some((digits, rest))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites() -> SitesConfig {
        SitesConfig {
            production_domain: "notebooks.example.org".to_string(),
            staging_domain: "staging.notebooks.example.org".to_string(),
        }
    }

    fn route(host: &str, path: &str) -> (String, String) {
        let r = route_request(host, path, &sites());
        (r.tenant.name(), r.path)
    }

    #[test]
    fn test_production_passes_path_through() {
        assert_eq!(
            route("notebooks.example.org", "/blob/index.html"),
            ("main".into(), "/blob/index.html".into())
        );
    }

    #[test]
    fn test_production_ignores_preview_pattern() {
        assert_eq!(
            route("notebooks.example.org", "/pr-5/anything"),
            ("main".into(), "/pr-5/anything".into())
        );
    }

    #[test]
    fn test_staging_preview_with_inner_path() {
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-5/x"),
            ("pr-5".into(), "/x".into())
        );
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-12/a/b/c.css"),
            ("pr-12".into(), "/a/b/c.css".into())
        );
    }

    #[test]
    fn test_staging_preview_without_inner_path() {
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-5"),
            ("pr-5".into(), "/".into())
        );
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-5/"),
            ("pr-5".into(), "/".into())
        );
    }

    #[test]
    fn test_staging_without_preview_falls_back_to_main() {
        assert_eq!(
            route("staging.notebooks.example.org", "/about"),
            ("main".into(), "/about".into())
        );
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-abc/x"),
            ("main".into(), "/pr-abc/x".into())
        );
        assert_eq!(
            route("staging.notebooks.example.org", "/pr-5abc"),
            ("main".into(), "/pr-5abc".into())
        );
    }

    #[test]
    fn test_unknown_host_falls_back_to_main() {
        assert_eq!(
            route("localhost:8080", "/pr-5/x"),
            ("main".into(), "/pr-5/x".into())
        );
    }

    #[test]
    fn test_host_port_is_ignored() {
        assert_eq!(
            route("staging.notebooks.example.org:443", "/pr-7/"),
            ("pr-7".into(), "/".into())
        );
    }

    #[test]
    fn test_parse_preview_path_grammar() {
        assert_eq!(parse_preview_path("/pr-0"), Some(("0", "")));
        assert_eq!(parse_preview_path("/pr-007/x"), Some(("007", "/x")));
        assert_eq!(parse_preview_path("/pr-"), None);
        assert_eq!(parse_preview_path("/pr-/x"), None);
        assert_eq!(parse_preview_path("/pr--1/x"), None);
        assert_eq!(parse_preview_path("/pr-1x/y"), None);
        assert_eq!(parse_preview_path("/PR-1/y"), None);
        assert_eq!(parse_preview_path("pr-1/y"), None);
        assert_eq!(parse_preview_path("/pr-١/y"), None);
    }

    #[test]
    fn test_manifest_key() {
        assert_eq!(Tenant::Production.manifest_key(), "manifests/main.json");
        assert_eq!(
            Tenant::Preview("42".into()).manifest_key(),
            "manifests/pr-42.json"
        );
    }
}
