//! HTTP cache control module
//!
//! Blobs are content-addressed, so the storage key doubles as a strong validator:
//! the bytes behind a key never change. The `Cache-Control` policy only has to
//! distinguish HTML, which must pick up republishes promptly, from everything else.

/// Shared-cache lifetime for HTML, matched to the manifest cache TTL.
pub const HTML_SHARED_MAX_AGE: u32 = 60;

/// One year, the conventional ceiling for immutable assets.
pub const IMMUTABLE_MAX_AGE: u32 = 31_536_000;

/// Cache-Control policy for a served blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Browsers revalidate every time; shared caches may hold it for `shared_max_age`
    Revalidate { shared_max_age: u32 },
    /// Cache forever, never revalidate
    Immutable { max_age: u32 },
}

impl CachePolicy {
    /// Pick the policy for a response of the given content type
    pub fn for_content_type(content_type: &str) -> Self {
        if super::mime::is_html(content_type) {
            Self::Revalidate {
                shared_max_age: HTML_SHARED_MAX_AGE,
            }
        } else {
            Self::Immutable {
                max_age: IMMUTABLE_MAX_AGE,
            }
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Revalidate { shared_max_age } => {
                format!("public, max-age=0, must-revalidate, s-maxage={shared_max_age}")
            }
            Self::Immutable { max_age } => format!("public, max-age={max_age}, immutable"),
        }
    }
}

/// Check if the client's `If-None-Match` header names the storage key
///
/// The key is compared verbatim: it is the exact value we hand out as the `ETag`,
/// so a client echoing it back gets a match and nothing else does.
pub fn validator_matches(if_none_match: Option<&str>, storage_key: &str) -> bool {
    if_none_match == Some(storage_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_revalidates() {
        let policy = CachePolicy::for_content_type("text/html; charset=utf-8");
        assert_eq!(policy, CachePolicy::Revalidate { shared_max_age: 60 });
        let value = policy.to_header_value();
        assert_eq!(value, "public, max-age=0, must-revalidate, s-maxage=60");
        assert!(!value.contains("immutable"));
    }

    #[test]
    fn test_assets_are_immutable() {
        for ct in [
            "text/css",
            "application/javascript",
            "image/png",
            "application/json",
            "application/octet-stream",
        ] {
            let value = CachePolicy::for_content_type(ct).to_header_value();
            assert_eq!(value, "public, max-age=31536000, immutable", "{ct}");
        }
    }

    #[test]
    fn test_validator_matches() {
        let key = "blobs/abc123.css";
        assert!(validator_matches(Some("blobs/abc123.css"), key));
        assert!(!validator_matches(Some("\"blobs/abc123.css\""), key));
        assert!(!validator_matches(Some("*"), key));
        assert!(!validator_matches(Some("blobs/other.css"), key));
        assert!(!validator_matches(None, key));
    }
}
