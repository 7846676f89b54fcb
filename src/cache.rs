//! Response Cache Module
//!
//! Read-through cache for entity API responses, shared by the screens of a
//! session. An explicit object with a defined TTL and invalidation API,
//! passed by reference to callers: created at session start, `clear()`-ed
//! at logout. Deliberately not a bare module-level singleton, so the
//! lifecycle is visible and testable.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry {
    value: JsonValue,
    stored_at: Instant,
}

/// TTL-bounded response cache keyed by request identity.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Return the cached value for `key` if present and not expired.
    /// Expired entries are evicted on access.
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but is stale; evict it.
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
        None
    }

    /// Store a value under `key`, resetting its TTL.
    pub fn insert(&self, key: &str, value: JsonValue) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), CacheEntry { value, stored_at: Instant::now() });
        }
    }

    /// Read-through: return the fresh cached value, or run the loader and
    /// cache its result. Loader errors propagate and cache nothing.
    pub fn get_or_load<E>(
        &self,
        key: &str,
        loader: impl FnOnce() -> Result<JsonValue, E>,
    ) -> Result<JsonValue, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = loader()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop a single entry.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Drop every entry. Called at logout.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
