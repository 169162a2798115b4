//! Manifest data types.
//!
//! On the wire a manifest is a JSON object mapping logical paths to entries:
//!
//! ```json
//! { "/index.html": { "hash": "9f2c…", "blob": "blobs/9f2c….html", "size": 5120 } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A manifest record pointing at one immutable blob.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    /// Hash of the blob content, as computed by the publisher.
    #[serde(rename = "hash")]
    pub content_hash: String,
    /// Object key of the blob. Also served as the response's `ETag`.
    #[serde(rename = "blob")]
    pub storage_key: String,
    /// Blob length in bytes.
    #[serde(rename = "size")]
    pub byte_size: u64,
}

/// A tenant's path → entry mapping, replaced wholesale on every publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: HashMap<String, Entry>,
}

impl Manifest {
    /// Parse a manifest object. Any structural mismatch is an error.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Exact lookup of a logical path.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Entry)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format() {
        let json = br#"{
            "/index.html": {"hash": "aa11", "blob": "blobs/aa11.html", "size": 42},
            "/app.js": {"hash": "bb22", "blob": "blobs/bb22.js", "size": 7}
        }"#;
        let manifest = Manifest::from_json(json).unwrap();
        assert_eq!(manifest.len(), 2);

        let entry = manifest.get("/index.html").unwrap();
        assert_eq!(entry.content_hash, "aa11");
        assert_eq!(entry.storage_key, "blobs/aa11.html");
        assert_eq!(entry.byte_size, 42);
    }

    #[test]
    fn empty_object_is_an_empty_manifest() {
        let manifest = Manifest::from_json(b"{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        for doc in [
            &b"not json"[..],
            b"[]",
            br#"{"/a": {"hash": "x", "blob": "blobs/x"}}"#,
            br#"{"/a": {"hash": "x", "blob": "blobs/x", "size": -1}}"#,
            br#"{"/a": "blobs/x"}"#,
        ] {
            assert!(Manifest::from_json(doc).is_err(), "{}", String::from_utf8_lossy(doc));
        }
    }
}
