//! Region storage: an eviction store plus time-to-live bookkeeping.

use crate::eviction::{store_for, EvictionPolicy, EvictionStore, Insertion};
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    written_at: Instant,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            written_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.written_at.elapsed() > ttl)
    }
}

/// Key/value storage for one region.
///
/// Expired entries are invisible: reads treat them as absent and drop them,
/// `len` purges them first.
pub(crate) struct RegionStore<K, V> {
    store: Box<dyn EvictionStore<K, Entry<V>>>,
    max_size: Option<usize>,
    ttl: Option<Duration>,
}

impl<K, V> RegionStore<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    pub(crate) fn new(max_size: Option<usize>, ttl: Option<Duration>, policy: EvictionPolicy) -> Self {
        Self {
            store: store_for(policy, max_size),
            max_size,
            ttl,
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let entry = self.store.get(key)?;
        if entry.is_expired(self.ttl) {
            self.store.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    /// Writes `value`; the outcome carries the displaced value and any
    /// entry dropped for capacity.
    ///
    /// A new key arriving at a full region first reclaims expired slots, so
    /// the policy only ever picks among live entries.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if self.ttl.is_some() && self.is_full() && !self.store.contains(&key) {
            self.purge_expired();
        }
        let outcome = self.store.insert(key, Entry::new(value));
        Insertion {
            replaced: outcome.replaced.map(|e| e.value),
            evicted: outcome.evicted.map(|(k, e)| (k, e.value)),
        }
    }

    /// Removes `key`, returning its value if it was live.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.store.remove(key)?;
        if entry.is_expired(self.ttl) {
            None
        } else {
            Some(entry.value)
        }
    }

    pub(crate) fn len(&mut self) -> usize {
        self.purge_expired();
        self.store.len()
    }

    /// Drops every entry and returns how many live ones there were.
    pub(crate) fn clear(&mut self) -> usize {
        let live = self.len();
        self.store.clear();
        live
    }

    fn is_full(&self) -> bool {
        self.max_size
            .is_some_and(|max| self.store.len() >= max.max(1))
    }

    fn purge_expired(&mut self) {
        if let Some(ttl) = self.ttl {
            self.store
                .retain(&mut |_, entry| !entry.is_expired(Some(ttl)));
        }
    }
}
