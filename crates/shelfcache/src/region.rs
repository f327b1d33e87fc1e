//! Cache regions: the [`Cache`] interface and its in-memory implementation.

use crate::events::CacheEvent;
use crate::eviction::EvictionPolicy;
use crate::store::RegionStore;
use crate::value::ValueWrapper;
use shelfcache_core::{EventListeners, FnListener};
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// A named cache region.
///
/// `get` distinguishes a miss (`None`) from a hit (`Some`); see
/// [`ValueWrapper`] for cached absences.
pub trait Cache<K, V>: Send + Sync {
    /// The region name used to look it up in a [`CacheManager`](crate::CacheManager).
    fn name(&self) -> &str;

    fn get(&self, key: &K) -> Option<ValueWrapper<V>>;

    /// Writes `value`, replacing whatever `key` held.
    fn put(&self, key: K, value: V);

    /// Caches the absence of a value for `key`.
    ///
    /// Returns false, leaving the region untouched, when the region does not
    /// accept absent values.
    fn put_absent(&self, key: K) -> bool;

    /// Writes `value` only if `key` is not cached. Returns the existing
    /// entry if there was one.
    fn put_if_absent(&self, key: K, value: V) -> Option<ValueWrapper<V>>;

    /// Removes `key`. Returns whether an entry was present.
    fn evict(&self, key: &K) -> bool;

    /// Removes every entry.
    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settings shared by the regions a manager creates.
#[derive(Clone, Debug)]
pub struct RegionConfig {
    pub(crate) max_size: Option<usize>,
    pub(crate) ttl: Option<Duration>,
    pub(crate) eviction_policy: EvictionPolicy,
    pub(crate) allow_absent_values: bool,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            max_size: None,
            ttl: None,
            eviction_policy: EvictionPolicy::default(),
            allow_absent_values: true,
            event_listeners: EventListeners::new(),
        }
    }
}

impl RegionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the number of entries per region.
    ///
    /// Default: unbounded
    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Entries older than `ttl` read as misses.
    ///
    /// Default: None (no expiration)
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Default: [`EvictionPolicy::Lru`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    /// Whether regions store absence markers.
    ///
    /// Default: true
    pub fn allow_absent_values(mut self, allow: bool) -> Self {
        self.allow_absent_values = allow;
        self
    }

    /// Registers a callback for every region event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(f));
        self
    }

    /// Registers a callback for capacity evictions.
    pub fn on_eviction<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.on_type("cache_eviction", move |_| f());
        self
    }
}

/// An in-memory region guarded by a mutex.
pub struct ConcurrentMapCache<K, V> {
    name: String,
    store: Mutex<RegionStore<K, ValueWrapper<V>>>,
    allow_absent_values: bool,
    event_listeners: EventListeners<CacheEvent>,
}

impl<K, V> ConcurrentMapCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Creates an unbounded region that accepts absent values.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &RegionConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &RegionConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!("cache_puts_total", "Total number of writes into a cache region");
            describe_counter!(
                "cache_evictions_total",
                "Total number of entries dropped to respect a region's size bound"
            );
            describe_gauge!("cache_size", "Current number of entries in a cache region");
        }

        Self {
            name: name.into(),
            store: Mutex::new(RegionStore::new(
                config.max_size,
                config.ttl,
                config.eviction_policy,
            )),
            allow_absent_values: config.allow_absent_values,
            event_listeners: config.event_listeners.clone(),
        }
    }

    /// Returns true if absent markers are stored.
    pub fn allows_absent_values(&self) -> bool {
        self.allow_absent_values
    }

    fn lock(&self) -> MutexGuard<'_, RegionStore<K, ValueWrapper<V>>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, key: K, value: ValueWrapper<V>) {
        let (evicted, size) = {
            let mut store = self.lock();
            let outcome = store.insert(key, value);
            (outcome.evicted.is_some(), store.len())
        };
        self.after_write(evicted, size);
    }

    fn after_write(&self, evicted: bool, size: usize) {
        #[cfg(feature = "metrics")]
        {
            counter!("cache_puts_total", "cache" => self.name.clone()).increment(1);
            gauge!("cache_size", "cache" => self.name.clone()).set(size as f64);
        }
        #[cfg(not(feature = "metrics"))]
        let _ = size;

        #[cfg(feature = "tracing")]
        debug!(cache = %self.name, "Cache put");

        self.event_listeners.emit(&CacheEvent::Put {
            cache_name: self.name.clone(),
            timestamp: Instant::now(),
        });

        if evicted {
            #[cfg(feature = "metrics")]
            counter!("cache_evictions_total", "cache" => self.name.clone()).increment(1);

            #[cfg(feature = "tracing")]
            info!(cache = %self.name, "Cache eviction occurred");

            self.event_listeners.emit(&CacheEvent::Eviction {
                cache_name: self.name.clone(),
                timestamp: Instant::now(),
            });
        }
    }

    #[cfg(feature = "metrics")]
    fn record_size(&self, size: usize) {
        gauge!("cache_size", "cache" => self.name.clone()).set(size as f64);
    }

    #[cfg(not(feature = "metrics"))]
    fn record_size(&self, _size: usize) {}
}

impl<K, V> Cache<K, V> for ConcurrentMapCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &K) -> Option<ValueWrapper<V>> {
        self.lock().get(key)
    }

    fn put(&self, key: K, value: V) {
        self.write(key, ValueWrapper::new(value));
    }

    fn put_absent(&self, key: K) -> bool {
        if !self.allow_absent_values {
            #[cfg(feature = "tracing")]
            debug!(cache = %self.name, "Absent value rejected");
            return false;
        }
        self.write(key, ValueWrapper::absent());
        true
    }

    fn put_if_absent(&self, key: K, value: V) -> Option<ValueWrapper<V>> {
        let (evicted, size) = {
            let mut store = self.lock();
            if let Some(existing) = store.get(&key) {
                return Some(existing);
            }
            let outcome = store.insert(key, ValueWrapper::new(value));
            (outcome.evicted.is_some(), store.len())
        };
        self.after_write(evicted, size);
        None
    }

    fn evict(&self, key: &K) -> bool {
        let (removed, size) = {
            let mut store = self.lock();
            let removed = store.remove(key).is_some();
            (removed, store.len())
        };
        if removed {
            self.record_size(size);

            #[cfg(feature = "tracing")]
            debug!(cache = %self.name, "Cache evict");

            self.event_listeners.emit(&CacheEvent::Evict {
                cache_name: self.name.clone(),
                timestamp: Instant::now(),
            });
        }
        removed
    }

    fn clear(&self) {
        let cleared = self.lock().clear();
        self.record_size(0);

        #[cfg(feature = "tracing")]
        debug!(cache = %self.name, cleared, "Cache cleared");

        self.event_listeners.emit(&CacheEvent::Clear {
            cache_name: self.name.clone(),
            cleared,
            timestamp: Instant::now(),
        });
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<K, V> fmt::Debug for ConcurrentMapCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMapCache")
            .field("name", &self.name)
            .field("allow_absent_values", &self.allow_absent_values)
            .finish_non_exhaustive()
    }
}
