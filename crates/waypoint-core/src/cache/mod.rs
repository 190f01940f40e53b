//! Time-bounded memoization for oracle responses.
//!
//! Entries pair an opaque JSON payload with a capture timestamp and are
//! valid strictly less than [`CACHE_TTL_SECS`] after capture. A lookup
//! that finds a stale or corrupt entry deletes it, so [`ResponseCache::sweep`]
//! is an optimization (run once at process start), not a correctness
//! requirement.

pub mod kv;

pub use kv::{FileStore, KvStore, MemoryStore};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Entry validity window: one hour.
pub const CACHE_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    payload: serde_json::Value,
    captured_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.captured_at < Duration::seconds(CACHE_TTL_SECS)
    }
}

/// TTL cache over an injectable [`KvStore`].
pub struct ResponseCache {
    store: Box<dyn KvStore>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.store.keys().len())
            .finish()
    }
}

impl ResponseCache {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Cache over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Look up a key, returning the payload only while it is fresh.
    ///
    /// Stale and corrupt entries are removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<serde_json::Value> {
        let raw = self.store.get(key)?;
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_fresh(Utc::now()) => {
                tracing::debug!(key, "cache hit");
                Some(entry.payload)
            }
            Ok(_) => {
                tracing::debug!(key, "cache entry stale, removing");
                self.store.remove(key);
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache entry corrupt, removing");
                self.store.remove(key);
                None
            }
        }
    }

    /// Store a payload captured now.
    pub fn set(&mut self, key: &str, payload: serde_json::Value) {
        self.set_at(key, payload, Utc::now());
    }

    /// Store a payload with an explicit capture time.
    pub fn set_at(&mut self, key: &str, payload: serde_json::Value, captured_at: DateTime<Utc>) {
        let entry = CacheEntry {
            payload,
            captured_at,
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                tracing::debug!(key, "cache set");
                self.store.set(key, &raw);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize cache entry, skipping");
            }
        }
    }

    /// Remove every stale or corrupt entry. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        for key in self.store.keys() {
            let stale = match self.store.get(&key) {
                Some(raw) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => !entry.is_fresh(now),
                    Err(_) => true,
                },
                None => false,
            };
            if stale {
                tracing::debug!(key, "sweeping stale cache entry");
                self.store.remove(&key);
                removed += 1;
            }
        }
        removed
    }
}
