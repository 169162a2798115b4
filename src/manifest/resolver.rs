//! Path resolution against a manifest.
//!
//! Candidates are tried in a fixed order and the first hit wins:
//!
//! 1. the path itself
//! 2. a trailing `/` removed (paths longer than `/` only)
//! 3. `index.html` appended as a directory child
//! 4. `.html` appended, when the last segment has no `.`

use super::types::{Entry, Manifest};

/// Resolve a tenant-relative path to its manifest entry
pub fn resolve<'a>(manifest: &'a Manifest, path: &str) -> Option<&'a Entry> {
    candidates(path).find_map(|candidate| manifest.get(&candidate))
}

/// Lookup keys for `path`, in priority order
pub fn candidates(path: &str) -> impl Iterator<Item = String> {
    let mut keys = Vec::with_capacity(4);
    keys.push(path.to_string());

    let trailing_slash = path.ends_with('/');
    if trailing_slash && path.len() > 1 {
        keys.push(path[..path.len() - 1].to_string());
    }

    if trailing_slash {
        keys.push(format!("{path}index.html"));
    } else {
        keys.push(format!("{path}/index.html"));
    }

    // Only the leaf decides: `/v1.2/about` still gets `.html`.
    let leaf = path.rsplit('/').next().unwrap_or(path);
    if !leaf.contains('.') {
        keys.push(format!("{path}.html"));
    }

    keys.into_iter()
}
