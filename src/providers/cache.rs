// =============================================================================
// TTL cache — injected into the data providers
// =============================================================================
//
// Upstream responses are memoised for a bounded time so that repeated
// analyses of the same ticker do not hammer the price and sentiment APIs.
// Expired entries are treated as absent.  A read evicts its own key; every
// write sweeps the whole map so stale tickers do not accumulate.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Key/value cache with per-entry time-to-live.
pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn put(&self, key: String, value: V, ttl: Duration);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process cache backed by a `HashMap` behind a `parking_lot::RwLock`.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let map = self.entries.read();
            match map.get(key) {
                Some(e) if e.expires_at > now => return Some(e.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired: drop it, unless a writer refreshed it in the meantime.
        let mut map = self.entries.write();
        if map.get(key).is_some_and(|e| e.expires_at <= now) {
            map.remove(key);
        }
        None
    }

    fn put(&self, key: String, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut map = self.entries.write();
        map.retain(|_, e| e.expires_at > now);
        map.insert(
            key,
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }
}

/// A cache that never stores anything.
pub struct NoCache;

impl<V> Cache<V> for NoCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _key: String, _value: V, _ttl: Duration) {}
}
