//! Cache store port
//!
//! Both cache tiers (the in-memory rate-limit cache and the
//! development persistent cache) are injected behind this trait, never
//! reached as ambient globals. That keeps the production-vs-development
//! gating testable by substitution.

use std::time::Duration;

use serde_json::Value;

pub trait CacheStore: Send + Sync {
    /// Valid entry for the key, or miss. Expired entries must never be
    /// returned; implementations evict them lazily here.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a value under the key for the given TTL. Last write wins
    /// under concurrent sets for the same key.
    fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Number of stored entries, including any not yet evicted
    fn entry_count(&self) -> usize;
}
