//! Development persistent cache
//!
//! Long-TTL cache backed by a single JSON file so it survives process
//! restarts, conserving provider quota during iterative local
//! development. The gateway only wires this store up outside
//! production.
//!
//! Writes are whole-file read-modify-write. A mutex serializes writers
//! within one process; separate processes sharing the file may still
//! lose updates. That is accepted for its best-effort, development-only
//! role rather than hardened away.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::GatewayError;
use crate::ports::cache::CacheStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    stored_at_ms: u64,
    ttl_ms: u64,
    value: Value,
}

impl PersistedEntry {
    fn is_valid(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at_ms) < self.ttl_ms
    }
}

#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full entry map. Any unreadable or malformed file is a
    /// cache miss, never fatal.
    fn load(&self) -> HashMap<String, PersistedEntry> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "{}",
                    GatewayError::CacheCorrupt(err.to_string())
                );
                return HashMap::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "{}",
                    GatewayError::CacheCorrupt(err.to_string())
                );
                HashMap::new()
            }
        }
    }

    fn persist(&self, entries: &HashMap<String, PersistedEntry>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    tracing::warn!(path = %self.path.display(), error = %err, "cannot create cache directory");
                    return;
                }
            }
        }
        match serde_json::to_string(entries) {
            Ok(text) => {
                if let Err(err) = fs::write(&self.path, text) {
                    tracing::warn!(path = %self.path.display(), error = %err, "cache write failed");
                }
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cache serialization failed");
            }
        }
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Self::now_ms();
        self.load()
            .get(key)
            .filter(|entry| entry.is_valid(now))
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let _guard = self.write_guard.lock().unwrap();
        let now = Self::now_ms();
        let mut entries = self.load();
        entries.retain(|_, entry| entry.is_valid(now));
        entries.insert(
            key.to_string(),
            PersistedEntry {
                stored_at_ms: now,
                ttl_ms: ttl.as_millis() as u64,
                value,
            },
        );
        self.persist(&entries);
    }

    fn entry_count(&self) -> usize {
        self.load().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> FileCache {
        FileCache::new(dir.path().join("dev_cache.json"))
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("trending-coins", json!({"coins": []}), Duration::from_secs(60));

        assert_eq!(cache.get("trending-coins"), Some(json!({"coins": []})));
    }

    #[test]
    fn test_entries_survive_new_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev_cache.json");

        FileCache::new(&path).set("k", json!(42), Duration::from_secs(60));
        let reopened = FileCache::new(&path);

        assert_eq!(reopened.get("k"), Some(json!(42)));
    }

    #[test]
    fn test_missing_file_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.get("anything").is_none());
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_corrupt_file_is_miss_not_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev_cache.json");
        fs::write(&path, "{not json at all").unwrap();

        let cache = FileCache::new(&path);
        assert!(cache.get("k").is_none());

        // Writing afterwards recovers the file.
        cache.set("k", json!(1), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!(1)));
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("k", json!(1), Duration::from_millis(20));
        assert!(cache.get("k").is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_set_prunes_expired_entries() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("old", json!(1), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(30));
        cache.set("new", json!(2), Duration::from_secs(60));

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get("new"), Some(json!(2)));
    }

    #[test]
    fn test_nested_directory_created() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("nested/dir/cache.json"));
        cache.set("k", json!(1), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!(1)));
    }
}
