//! Cache managers hand out regions by name.

use crate::events::CacheEvent;
use crate::eviction::EvictionPolicy;
use crate::region::{Cache, ConcurrentMapCache, RegionConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Looks up cache regions by name.
pub trait CacheManager<K, V>: Send + Sync {
    /// Returns the region called `name`, or `None` if the manager does not
    /// know it.
    fn get_cache(&self, name: &str) -> Option<Arc<dyn Cache<K, V>>>;

    /// Names of the regions currently known, sorted.
    fn cache_names(&self) -> Vec<String>;
}

/// A manager of [`ConcurrentMapCache`] regions.
///
/// Built with a fixed list of names the manager is *static*: unknown names
/// resolve to `None`. Built without names it is *dynamic* and creates a
/// region the first time a name is requested.
///
/// # Examples
///
/// ```
/// use shelfcache::{Cache, CacheManager, ConcurrentMapCacheManager};
///
/// let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
///     .cache_names(["default", "another"])
///     .build();
///
/// let default = manager.get_cache("default").unwrap();
/// default.put(1, "Some book".to_string());
///
/// assert!(manager.get_cache("another").unwrap().get(&1).is_none());
/// assert!(manager.get_cache("unknown").is_none());
/// ```
pub struct ConcurrentMapCacheManager<K, V> {
    caches: RwLock<BTreeMap<String, Arc<ConcurrentMapCache<K, V>>>>,
    dynamic: bool,
    region_config: RegionConfig,
}

impl<K, V> ConcurrentMapCacheManager<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// A dynamic manager with default region settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ConcurrentMapCacheManagerBuilder<K, V> {
        ConcurrentMapCacheManagerBuilder::new()
    }

    /// Returns true if unknown names create regions on demand.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Typed access to a region, creating it when the manager is dynamic.
    pub fn region(&self, name: &str) -> Option<Arc<ConcurrentMapCache<K, V>>> {
        if let Some(existing) = self.read_region(name) {
            return Some(existing);
        }
        if !self.dynamic {
            return None;
        }

        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        let region = caches.entry(name.to_string()).or_insert_with(|| {
            #[cfg(feature = "tracing")]
            debug!(cache = %name, "Creating cache region on demand");

            Arc::new(ConcurrentMapCache::with_config(name, &self.region_config))
        });
        Some(Arc::clone(region))
    }

    fn read_region(&self, name: &str) -> Option<Arc<ConcurrentMapCache<K, V>>> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl<K, V> Default for ConcurrentMapCacheManager<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheManager<K, V> for ConcurrentMapCacheManager<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn get_cache(&self, name: &str) -> Option<Arc<dyn Cache<K, V>>> {
        self.region(name)
            .map(|region| region as Arc<dyn Cache<K, V>>)
    }

    fn cache_names(&self) -> Vec<String> {
        self.caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl<K, V> fmt::Debug for ConcurrentMapCacheManager<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .caches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("ConcurrentMapCacheManager")
            .field("cache_names", &names)
            .field("dynamic", &self.dynamic)
            .finish()
    }
}

/// Builder for [`ConcurrentMapCacheManager`].
pub struct ConcurrentMapCacheManagerBuilder<K, V> {
    names: Vec<String>,
    region_config: RegionConfig,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> ConcurrentMapCacheManagerBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            region_config: RegionConfig::default(),
            _types: PhantomData,
        }
    }

    /// Fixes the set of regions. Makes the manager static.
    pub fn cache_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Bounds every region to `size` entries.
    pub fn max_size(mut self, size: usize) -> Self {
        self.region_config = self.region_config.max_size(size);
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.region_config = self.region_config.ttl(ttl);
        self
    }

    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.region_config = self.region_config.eviction_policy(policy);
        self
    }

    pub fn allow_absent_values(mut self, allow: bool) -> Self {
        self.region_config = self.region_config.allow_absent_values(allow);
        self
    }

    /// Registers a callback for every event of every region.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.region_config = self.region_config.on_event(f);
        self
    }

    /// Replaces the region settings wholesale.
    pub fn region_config(mut self, config: RegionConfig) -> Self {
        self.region_config = config;
        self
    }

    pub fn build(self) -> ConcurrentMapCacheManager<K, V> {
        let dynamic = self.names.is_empty();
        let caches = self
            .names
            .into_iter()
            .map(|name| {
                let region = Arc::new(ConcurrentMapCache::with_config(
                    name.as_str(),
                    &self.region_config,
                ));
                (name, region)
            })
            .collect();

        ConcurrentMapCacheManager {
            caches: RwLock::new(caches),
            dynamic,
            region_config: self.region_config,
        }
    }
}

impl<K, V> Default for ConcurrentMapCacheManagerBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ConcurrentMapCacheManagerBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMapCacheManagerBuilder")
            .field("names", &self.names)
            .field("region_config", &self.region_config)
            .finish()
    }
}
