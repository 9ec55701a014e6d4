//! Per-conversation message cache.

use parking_lot::RwLock;
use tracing::debug;

use super::{CacheConfig, CacheKey, LruMap};

/// Bounded LRU cache of messages for one group or one friend.
///
/// Reads refresh recency, so `get` takes the write lock just like `put`.
/// Each scope has its own lock; scopes never contend with each other.
pub struct ScopeCache<P> {
    inner: RwLock<LruMap<CacheKey, P>>,
    capacity: usize,
}

impl<P: Clone> ScopeCache<P> {
    /// Create a scope cache sized from `config`.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: RwLock::new(LruMap::with_table_size(
                config.capacity,
                config.initial_table_size(),
            )),
            capacity: config.capacity,
        }
    }

    /// Cache a message, evicting the least recently used one when full.
    pub fn put(&self, key: CacheKey, payload: P) {
        let evicted = self.inner.write().put(key, payload);
        if let Some((key, _)) = evicted {
            debug!("Evicted cached message {}", key);
        }
    }

    /// Get a cached message and mark it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<P> {
        self.inner.write().get(key).cloned()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Drop every cached message.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<P> std::fmt::Debug for ScopeCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeCache")
            .field("capacity", &self.capacity)
            .field("len", &self.inner.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seq: i32) -> CacheKey {
        CacheKey::derive(&[seq], &[seq * 10], 1000)
    }

    #[test]
    fn test_put_then_get() {
        let cache = ScopeCache::new(CacheConfig::with_capacity(4));
        cache.put(key(1), "hi".to_string());
        assert_eq!(cache.get(&key(1)).as_deref(), Some("hi"));
        assert_eq!(cache.get(&key(2)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let cache = ScopeCache::new(CacheConfig::with_capacity(2));
        cache.put(key(1), "a");
        cache.put(key(2), "b");
        assert_eq!(cache.get(&key(1)), Some("a"));
        cache.put(key(3), "c");

        assert_eq!(cache.get(&key(2)), None);
        assert_eq!(cache.get(&key(1)), Some("a"));
        assert_eq!(cache.get(&key(3)), Some("c"));
    }

    #[test]
    fn test_capacity_zero() {
        let cache = ScopeCache::new(CacheConfig::with_capacity(0));
        cache.put(key(1), 1u8);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key(1)), None);
    }

    #[test]
    fn test_concurrent_puts_respect_capacity() {
        let cache = ScopeCache::new(CacheConfig::with_capacity(16));
        std::thread::scope(|s| {
            for t in 0..8 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..200 {
                        cache.put(key(t * 1000 + i), i);
                        cache.get(&key(t * 1000 + i / 2));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 16);
    }

    #[test]
    fn test_clear() {
        let cache = ScopeCache::new(CacheConfig::with_capacity(2));
        cache.put(key(1), ());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
    }
}
