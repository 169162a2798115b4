//! Host matching module
//!
//! Compares a request's host against configured domain names the way URL
//! hostnames compare: port stripped, ASCII case ignored.

/// Strip the port from a Host header value
///
/// Handles bracketed IPv6 literals (`[::1]:8080` -> `[::1]`).
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.split(':').next().unwrap_or(host)
}

/// Match a request host against a configured domain
pub fn host_matches(domain: &str, host: &str) -> bool {
    !domain.is_empty() && strip_port(host).eq_ignore_ascii_case(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_exact() {
        assert!(host_matches("site.example.com", "site.example.com"));
        assert!(!host_matches("site.example.com", "www.site.example.com"));
    }

    #[test]
    fn test_match_ignores_case() {
        assert!(host_matches("site.example.com", "Site.Example.COM"));
    }

    #[test]
    fn test_match_with_port() {
        assert!(host_matches("site.example.com", "site.example.com:8080"));
        assert!(host_matches("[::1]", "[::1]:8080"));
    }

    #[test]
    fn test_empty_domain_never_matches() {
        assert!(!host_matches("", ""));
        assert!(!host_matches("", ":8080"));
    }
}
