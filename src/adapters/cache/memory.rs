//! In-memory rate-limit cache
//!
//! Short-TTL store keyed by normalized request, protecting upstream
//! providers from repeated identical calls within a rate-limit window.
//! Best-effort de-duplication, not a correctness-critical store:
//! last write wins, and two concurrent misses both fetching is a benign,
//! self-correcting race.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::ports::cache::CacheStore;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl StoredEntry {
    fn is_valid(&self) -> bool {
        self.inserted_at.elapsed() < self.ttl
    }
}

#[derive(Debug)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, StoredEntry>>,
    /// Maximum entries before cleanup
    max_entries: usize,
}

impl TtlCache {
    /// Default max cache entries
    pub const DEFAULT_MAX_ENTRIES: usize = 2048;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Remove expired entries
    pub fn cleanup(&self) {
        self.entries
            .lock()
            .unwrap()
            .retain(|_, entry| entry.is_valid());
    }

    /// Number of entries that are still valid
    pub fn valid_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.is_valid())
            .count()
    }

    fn remove_oldest(entries: &mut HashMap<String, StoredEntry>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone())
        {
            entries.remove(&oldest_key);
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for TtlCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.is_valid() => Some(entry.value.clone()),
            Some(_) => {
                // Lazy eviction: expired entries are dropped on read.
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            entries.retain(|_, entry| entry.is_valid());
            if entries.len() >= self.max_entries {
                Self::remove_oldest(&mut entries);
            }
        }
        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
