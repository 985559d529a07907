//! Short-lived cache for the last upload response.
//!
//! Mirrors the behavior of a small cookie: the payload is truncated to a
//! fixed byte budget before saving, and entries expire after one day. A
//! payload that no longer parses after truncation reads as absent rather
//! than erroring.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mlboard_core::error::{BoardError, Result};

use crate::paths::{BoardPaths, PathError};
use crate::storage::AtomicJsonFile;

/// Serialized payload budget, kept small on purpose.
pub const PAYLOAD_LIMIT_BYTES: usize = 3500;

const TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    saved_at: DateTime<Utc>,
    payload: String,
}

/// The upload-response cache file.
pub struct UploadCache {
    file: AtomicJsonFile<CachedResponse>,
}

impl UploadCache {
    /// Creates a cache at the default location.
    pub fn new() -> std::result::Result<Self, PathError> {
        Ok(Self::with_path(BoardPaths::upload_cache_file()?))
    }

    /// Creates a cache at an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Stores a response, truncating the serialized payload to the budget.
    pub fn store(&self, response: &Value) -> Result<()> {
        let serialized = serde_json::to_string(response)?;
        let payload = truncate_at_boundary(&serialized, PAYLOAD_LIMIT_BYTES).to_string();
        self.file
            .save(&CachedResponse {
                saved_at: Utc::now(),
                payload,
            })
            .map_err(|e| BoardError::storage(e.to_string()))
    }

    /// Returns the cached response, or `None` when the cache is missing,
    /// expired, or holds a payload the truncation made unparseable.
    pub fn load(&self) -> Result<Option<Value>> {
        let Some(entry) = self
            .file
            .load()
            .map_err(|e| BoardError::storage(e.to_string()))?
        else {
            return Ok(None);
        };
        if Utc::now() - entry.saved_at > Duration::hours(TTL_HOURS) {
            return Ok(None);
        }
        Ok(serde_json::from_str(&entry.payload).ok())
    }

    /// Drops the cached response.
    pub fn clear(&self) -> Result<()> {
        self.file
            .remove()
            .map_err(|e| BoardError::storage(e.to_string()))
    }
}

// Truncation must not split a UTF-8 code point.
fn truncate_at_boundary(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> UploadCache {
        UploadCache::with_path(dir.path().join("upload_cache.json"))
    }

    #[test]
    fn round_trips_small_responses() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let response = json!({"id": 42, "name": "housing"});

        cache.store(&response).unwrap();
        assert_eq!(cache.load().unwrap(), Some(response));

        cache.clear().unwrap();
        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn truncated_payload_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        // Far over the budget; the stored JSON gets cut mid-document.
        let response = json!({"blob": "x".repeat(2 * PAYLOAD_LIMIT_BYTES)});

        cache.store(&response).unwrap();
        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let stale = CachedResponse {
            saved_at: Utc::now() - Duration::hours(TTL_HOURS + 1),
            payload: "{\"id\":1}".to_string(),
        };
        cache.file.save(&stale).unwrap();

        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "é".repeat(10); // 2 bytes each
        let cut = truncate_at_boundary(&s, 5);
        assert_eq!(cut, "éé");
    }
}
