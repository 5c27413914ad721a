//! Single-slot disk cache with expiration.
//!
//! One physical slot per instance: `put` always replaces the previous entry.
//! The cache is an optimization, not a correctness dependency — every
//! failure path (missing file, corrupt JSON, expired entry, write error)
//! degrades to a cache miss and never reaches the caller as an error.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default time-to-live for cached payloads.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Serialize, Deserialize)]
struct Entry<T> {
    data: T,
    timestamp: DateTime<Utc>,
}

/// A time-boxed cache slot for one payload type, persisted as a JSON file in
/// the OS cache directory. Cache contents are evictable by the OS at any
/// time, so callers must always be able to re-fetch.
pub struct DiskCache<T> {
    path: PathBuf,
    ttl: Duration,
    _payload: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> DiskCache<T> {
    /// A named slot under the platform cache directory.
    pub fn new(name: &str, ttl: Duration) -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stacks");
        Self::at(dir.join(format!("{name}.json")), ttl)
    }

    /// A slot at an explicit path. Used by tests to stay inside a tempdir.
    pub fn at(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl, _payload: PhantomData }
    }

    /// Store a payload, stamping it with the current time. Overwrites any
    /// previous entry. Write failures are logged and swallowed.
    pub fn put(&self, data: &T) {
        let entry = Entry { data, timestamp: Utc::now() };
        let json = match serde_json::to_vec(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cache encode failed");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                tracing::warn!(path = %self.path.display(), "cache dir unavailable");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "cache write failed");
        }
    }

    /// The cached payload, or `None` when the slot is absent, corrupt, or
    /// expired. Callers cannot distinguish "never cached" from "expired".
    pub fn get(&self) -> Option<T> {
        let bytes = std::fs::read(&self.path).ok()?;
        let entry: Entry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cache decode failed, treating as miss");
                return None;
            }
        };
        let age = Utc::now()
            .signed_duration_since(entry.timestamp)
            .to_std()
            .unwrap_or_default();
        if age >= self.ttl {
            return None;
        }
        Some(entry.data)
    }

    /// Drop the slot. Missing files are fine.
    pub fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn slot(dir: &TempDir, ttl: Duration) -> DiskCache<Vec<String>> {
        DiskCache::at(dir.path().join("books.json"), ttl)
    }

    #[test]
    fn round_trips_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = slot(&dir, Duration::from_secs(60));
        cache.put(&vec!["dune".to_string()]);
        assert_eq!(cache.get(), Some(vec!["dune".to_string()]));
    }

    #[test]
    fn put_replaces_the_single_slot() {
        let dir = TempDir::new().unwrap();
        let cache = slot(&dir, Duration::from_secs(60));
        cache.put(&vec!["a".to_string()]);
        cache.put(&vec!["b".to_string()]);
        assert_eq!(cache.get(), Some(vec!["b".to_string()]));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let dir = TempDir::new().unwrap();
        let cache = slot(&dir, Duration::ZERO);
        cache.put(&vec!["dune".to_string()]);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        let stale = serde_json::json!({
            "data": ["dune"],
            "timestamp": Utc::now() - chrono::Duration::hours(2),
        });
        std::fs::write(&path, serde_json::to_vec(&stale).unwrap()).unwrap();
        let cache: DiskCache<Vec<String>> = DiskCache::at(path, Duration::from_secs(3600));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn corrupt_file_is_a_miss_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, b"{{{ not json").unwrap();
        let cache: DiskCache<Vec<String>> = DiskCache::at(path, Duration::from_secs(60));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn absent_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = slot(&dir, Duration::from_secs(60));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = slot(&dir, Duration::from_secs(60));
        cache.put(&vec!["x".to_string()]);
        cache.clear();
        cache.clear();
        assert_eq!(cache.get(), None);
    }
}
