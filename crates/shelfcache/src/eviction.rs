//! Size-bound eviction policies for cache regions.
//!
//! A region is unbounded unless it is given a maximum size. Once bounded,
//! the policy decides which entry makes room for a new key. Replacing the
//! value of an existing key never evicts anything.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Which entry a bounded region drops when it is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EvictionPolicy {
    /// Least Recently Used: drops the entry read or written longest ago.
    #[default]
    Lru,

    /// Least Frequently Used: drops the entry with the fewest reads.
    Lfu,

    /// First In, First Out: drops the oldest insertion regardless of reads.
    Fifo,
}

/// Outcome of writing a key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Insertion<K, V> {
    /// Previous value of the same key.
    pub(crate) replaced: Option<V>,
    /// Entry dropped to make room for a new key.
    pub(crate) evicted: Option<(K, V)>,
}

impl<K, V> Insertion<K, V> {
    fn fresh(evicted: Option<(K, V)>) -> Self {
        Self {
            replaced: None,
            evicted,
        }
    }

    fn replaced(old: Option<V>) -> Self {
        Self {
            replaced: old,
            evicted: None,
        }
    }
}

/// Storage backing one region, parameterised by policy.
pub(crate) trait EvictionStore<K, V>: Send {
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Presence check that leaves recency and frequency untouched.
    fn contains(&self, key: &K) -> bool;

    fn insert(&mut self, key: K, value: V) -> Insertion<K, V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    /// Drops every entry for which `keep` returns false.
    fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool);

    fn len(&self) -> usize;

    fn clear(&mut self);
}

/// Builds the store for `policy`. `None` means unbounded.
pub(crate) fn store_for<K, V>(
    policy: EvictionPolicy,
    max_size: Option<usize>,
) -> Box<dyn EvictionStore<K, V>>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    match policy {
        EvictionPolicy::Lru => Box::new(LruStore::new(max_size)),
        EvictionPolicy::Lfu => Box::new(LfuStore::new(max_size)),
        EvictionPolicy::Fifo => Box::new(FifoStore::new(max_size)),
    }
}

fn bound(max_size: Option<usize>) -> usize {
    max_size.map(|n| n.max(1)).unwrap_or(usize::MAX)
}

pub(crate) struct LruStore<K, V> {
    cache: lru::LruCache<K, V>,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    pub(crate) fn new(max_size: Option<usize>) -> Self {
        let cache = match max_size.and_then(NonZeroUsize::new) {
            Some(cap) => lru::LruCache::new(cap),
            None if max_size.is_some() => lru::LruCache::new(NonZeroUsize::MIN),
            None => lru::LruCache::unbounded(),
        };
        Self { cache }
    }
}

impl<K: Hash + Eq + Clone + Send, V: Send> EvictionStore<K, V> for LruStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        self.cache.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if self.cache.contains(&key) {
            return Insertion::replaced(self.cache.put(key, value));
        }
        let evicted = if self.cache.len() >= self.cache.cap().get() {
            self.cache.pop_lru()
        } else {
            None
        };
        self.cache.put(key, value);
        Insertion::fresh(evicted)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.cache.pop(key)
    }

    fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool) {
        let doomed: Vec<K> = self
            .cache
            .iter()
            .filter(|(k, v)| !keep(*k, *v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            self.cache.pop(&key);
        }
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn clear(&mut self) {
        self.cache.clear();
    }
}

pub(crate) struct LfuStore<K, V> {
    data: HashMap<K, (V, usize)>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LfuStore<K, V> {
    pub(crate) fn new(max_size: Option<usize>) -> Self {
        Self {
            data: HashMap::new(),
            capacity: bound(max_size),
        }
    }

    fn least_used(&self) -> Option<K> {
        self.data
            .iter()
            .min_by_key(|(_, (_, reads))| *reads)
            .map(|(k, _)| k.clone())
    }
}

impl<K: Hash + Eq + Clone + Send, V: Send> EvictionStore<K, V> for LfuStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        let (value, reads) = self.data.get_mut(key)?;
        *reads += 1;
        Some(&*value)
    }

    fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if let Some((slot, _)) = self.data.get_mut(&key) {
            return Insertion::replaced(Some(std::mem::replace(slot, value)));
        }
        let evicted = if self.data.len() >= self.capacity {
            self.least_used().and_then(|victim| {
                self.data
                    .remove(&victim)
                    .map(|(old, _)| (victim, old))
            })
        } else {
            None
        };
        self.data.insert(key, (value, 0));
        Insertion::fresh(evicted)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.data.remove(key).map(|(v, _)| v)
    }

    fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool) {
        self.data.retain(|k, (v, _)| keep(k, v));
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

pub(crate) struct FifoStore<K, V> {
    data: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> FifoStore<K, V> {
    pub(crate) fn new(max_size: Option<usize>) -> Self {
        Self {
            data: HashMap::new(),
            order: VecDeque::new(),
            capacity: bound(max_size),
        }
    }
}

impl<K: Hash + Eq + Clone + Send, V: Send> EvictionStore<K, V> for FifoStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if let Some(slot) = self.data.get_mut(&key) {
            return Insertion::replaced(Some(std::mem::replace(slot, value)));
        }
        let evicted = if self.data.len() >= self.capacity {
            self.order
                .pop_front()
                .and_then(|oldest| self.data.remove(&oldest).map(|v| (oldest, v)))
        } else {
            None
        };
        self.order.push_back(key.clone());
        self.data.insert(key, value);
        Insertion::fresh(evicted)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.data.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    fn retain(&mut self, keep: &mut dyn FnMut(&K, &V) -> bool) {
        self.data.retain(|k, v| keep(k, v));
        let data = &self.data;
        self.order.retain(|k| data.contains_key(k));
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.order.clear();
    }
}
