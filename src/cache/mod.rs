//! Read-through response cache
//!
//! Short-lived cache for query results, keyed by string. Entries expire
//! after a TTL (default 3 s); stale entries are evicted lazily on read and
//! by a periodic sweep. Values are stored as JSON so heterogeneous response
//! shapes can share one map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

/// Periodic sweep interval, a backstop for keys written but never re-read.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    value: serde_json::Value,
    created_at: Instant,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Cache key builders for the two query shapes that go through the cache.
pub mod cache_keys {
    pub fn points_info() -> String {
        "points_info".to_string()
    }

    pub fn calendar(year: i32, month: u32) -> String {
        format!("calendar_{}_{}", year, month)
    }
}

/// Counts reported by [`Cache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

#[derive(Clone)]
pub struct Cache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store with the default TTL.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, DEFAULT_TTL);
    }

    pub fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("refusing to cache unserializable value for {}: {}", key, err);
                return;
            }
        };

        let now = Instant::now();
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value,
                created_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Fetch a fresh entry. A present-but-stale entry is deleted on the way
    /// out (lazy eviction) and reported as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;

        if entry.is_expired(Instant::now()) {
            tracing::trace!(
                "evicting stale cache entry {} (age {:?})",
                key,
                entry.created_at.elapsed()
            );
            entries.remove(key);
            return None;
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("cached value for {} has the wrong shape: {}", key, err);
                entries.remove(key);
                None
            }
        }
    }

    /// A fresh entry exists for this key.
    pub fn has(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    pub fn delete(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Sweep all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .retain(|_, entry| !entry.is_expired(now));
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap();
        let expired = entries
            .values()
            .filter(|entry| entry.is_expired(now))
            .count();
        CacheStats {
            total: entries.len(),
            valid: entries.len() - expired,
            expired,
        }
    }

    /// Spawn the periodic sweep. The task runs until the handle is aborted
    /// or the runtime shuts down.
    pub fn spawn_cleanup(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                cache.cleanup();
            }
        })
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_the_value() {
        let cache = Cache::new();
        cache.set("k", &42u32);
        assert_eq!(cache.get::<u32>("k"), Some(42));
        assert!(cache.has("k"));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = Cache::new();
        cache.set_with_ttl("k", &1u32, Duration::from_millis(10));
        assert_eq!(cache.get::<u32>("k"), Some(1));

        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get::<u32>("k"), None);
        assert!(!cache.has("k"));
    }

    #[test]
    fn stale_read_evicts_lazily() {
        let cache = Cache::new();
        cache.set_with_ttl("k", &1u32, Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(15));

        assert_eq!(cache.stats().total, 1);
        assert_eq!(cache.get::<u32>("k"), None);
        assert_eq!(cache.stats().total, 0);
    }

    #[test]
    fn cleanup_removes_exactly_the_expired_entries() {
        let cache = Cache::new();
        cache.set_with_ttl("stale", &1u32, Duration::from_millis(5));
        cache.set_with_ttl("fresh", &2u32, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(15));

        cache.cleanup();

        let stats = cache.stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.valid, 1);
        assert_eq!(cache.get::<u32>("fresh"), Some(2));
    }

    #[test]
    fn delete_and_clear() {
        let cache = Cache::new();
        cache.set("a", &1u32);
        cache.set("b", &2u32);

        cache.delete("a");
        assert_eq!(cache.get::<u32>("a"), None);
        assert_eq!(cache.get::<u32>("b"), Some(2));

        cache.clear();
        assert_eq!(cache.stats().total, 0);
    }

    #[test]
    fn overwrite_replaces_the_entry() {
        let cache = Cache::new();
        cache.set_with_ttl("k", &1u32, Duration::from_millis(5));
        cache.set("k", &2u32);
        std::thread::sleep(Duration::from_millis(15));
        // the overwrite carries the new TTL, not the original one
        assert_eq!(cache.get::<u32>("k"), Some(2));
    }

    #[test]
    fn wrong_shape_is_dropped() {
        let cache = Cache::new();
        cache.set("k", &"text");
        assert_eq!(cache.get::<u32>("k"), None);
        assert!(!cache.has("k"));
    }

    #[tokio::test]
    async fn periodic_sweep_runs() {
        let cache = Cache::new();
        cache.set_with_ttl("k", &1u32, Duration::from_millis(5));

        let handle = cache.spawn_cleanup(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();

        assert_eq!(cache.stats().total, 0);
    }
}
