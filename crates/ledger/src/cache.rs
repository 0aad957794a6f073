//! Explicit snapshot cache keyed by source descriptor.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    loaded_at: Instant,
}

/// In-memory, process-local cache of immutable snapshots.
///
/// Entries are shared as `Arc<V>`; callers never mutate a cached value. With a TTL set,
/// an entry is fresh while its age is strictly below the TTL and is treated as absent
/// afterwards.
#[derive(Debug)]
pub struct SnapshotCache<K, V> {
    inner: RwLock<HashMap<K, Entry<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> SnapshotCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Cache without expiry (entries live until invalidated).
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.loaded_at.elapsed() < ttl,
            None => true,
        }
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let map = self.inner.read().ok()?;
        map.get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| Arc::clone(&entry.value))
    }

    pub fn insert(&self, key: K, value: Arc<V>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(
                key,
                Entry {
                    value,
                    loaded_at: Instant::now(),
                },
            );
        }
    }

    /// Return the cached value, or build, cache and return a new one.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        build: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = Arc::new(build()?);
        self.insert(key.clone(), Arc::clone(&value));
        Ok(value)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(key).is_some(),
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    /// Number of stored entries (stale ones included until replaced or invalidated).
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for SnapshotCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
