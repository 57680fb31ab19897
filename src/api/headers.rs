//! Header helpers for conditional requests.

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing.
    fn get_str(&self, name: &str) -> Option<&str>;

    /// Whether `If-None-Match` lists `etag` (or is `*`).
    fn etag_matches(&self, etag: &str) -> bool;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn etag_matches(&self, etag: &str) -> bool {
        let Some(value) = self.get_str(header::IF_NONE_MATCH.as_str()) else {
            return false;
        };
        value.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    }
}

/// Strong ETag for a response body: quoted hex SHA-256.
pub fn etag_for(bytes: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(bytes)))
}
