//! Configuration shared by the cache-operation layers.

use crate::cacheable::CacheableLayer;
use crate::events::CacheEvent;
use crate::evict::{CacheEvictLayer, EvictTarget};
use crate::put::CachePutLayer;
use crate::resolver::{CacheResolver, NamedCacheResolver, SharedCacheManager};
use shelfcache_core::{EventListeners, FnListener};
use std::sync::Arc;

/// Function that extracts a cache key from a request.
pub type KeyExtractor<Req, K> = Arc<dyn Fn(&Req) -> K + Send + Sync>;

/// Predicate deciding whether an operation applies to a request.
pub type Condition<Req> = Arc<dyn Fn(&Req) -> bool + Send + Sync>;

/// Configuration common to every cache operation.
pub struct CacheOperationConfig<Req, K, V> {
    pub(crate) name: String,
    pub(crate) resolver: Arc<dyn CacheResolver<Req, K, V>>,
    pub(crate) condition: Option<Condition<Req>>,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
}

impl<Req, K, V> CacheOperationConfig<Req, K, V> {
    /// The operation name used in events, logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn applies(&self, req: &Req) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition(req))
    }
}

/// Builder for the cacheable, put and evict layers.
///
/// Regions come either from an explicit [`CacheResolver`] or from a cache
/// manager plus a fixed list of names. A key extractor is required except
/// for an evict-all operation.
///
/// # Examples
///
/// ```
/// use shelfcache::{CacheOperationBuilder, ConcurrentMapCacheManager, SharedCacheManager};
/// use std::sync::Arc;
///
/// let manager: SharedCacheManager<u64, String> = Arc::new(
///     ConcurrentMapCacheManager::<u64, String>::builder().cache_names(["default"]).build(),
/// );
///
/// let find = CacheOperationBuilder::<u64, u64, String>::new()
///     .name("find")
///     .cache_manager(Arc::clone(&manager))
///     .cache_names(["default"])
///     .key_extractor(|id: &u64| *id)
///     .cacheable();
///
/// let clear = CacheOperationBuilder::<(), u64, String>::new()
///     .name("clear")
///     .cache_manager(manager)
///     .cache_names(["default"])
///     .all_entries(true)
///     .evict();
/// ```
pub struct CacheOperationBuilder<Req, K, V> {
    name: String,
    key_extractor: Option<KeyExtractor<Req, K>>,
    resolver: Option<Arc<dyn CacheResolver<Req, K, V>>>,
    cache_manager: Option<SharedCacheManager<K, V>>,
    cache_names: Vec<String>,
    condition: Option<Condition<Req>>,
    event_listeners: EventListeners<CacheEvent>,
    all_entries: bool,
    before_invocation: bool,
}

impl<Req, K, V> CacheOperationBuilder<Req, K, V>
where
    Req: 'static,
    K: 'static,
    V: 'static,
{
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            name: String::from("<unnamed>"),
            key_extractor: None,
            resolver: None,
            cache_manager: None,
            cache_names: Vec::new(),
            condition: None,
            event_listeners: EventListeners::new(),
            all_entries: false,
            before_invocation: false,
        }
    }

    /// Sets the operation name for observability.
    ///
    /// Default: `"<unnamed>"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the function that extracts a cache key from a request.
    pub fn key_extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Req) -> K + Send + Sync + 'static,
    {
        self.key_extractor = Some(Arc::new(f));
        self
    }

    /// Uses `resolver` to pick regions. Takes precedence over
    /// [`cache_manager`](Self::cache_manager) and [`cache_names`](Self::cache_names).
    pub fn resolver<R>(mut self, resolver: R) -> Self
    where
        R: CacheResolver<Req, K, V> + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Manager used to look up [`cache_names`](Self::cache_names).
    pub fn cache_manager(mut self, manager: SharedCacheManager<K, V>) -> Self {
        self.cache_manager = Some(manager);
        self
    }

    /// Fixed region names, looked up in the cache manager on every call.
    pub fn cache_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cache_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Only apply the operation to requests matching `condition`; other
    /// requests go straight to the wrapped service.
    pub fn condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Req) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Evict operations only: clear the resolved regions instead of one key.
    pub fn all_entries(mut self, all_entries: bool) -> Self {
        self.all_entries = all_entries;
        self
    }

    /// Evict operations only: evict before calling the wrapped service,
    /// whatever its outcome.
    pub fn before_invocation(mut self, before: bool) -> Self {
        self.before_invocation = before;
        self
    }

    /// Registers a callback to be invoked when a cache hit occurs.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.on_type("cache_hit", move |_| f());
        self
    }

    /// Registers a callback to be invoked when a cache miss occurs.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.on_type("cache_miss", move |_| f());
        self
    }

    /// Registers a callback for every event this operation emits.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(f));
        self
    }

    /// Builds a read-through layer.
    ///
    /// # Panics
    ///
    /// Panics if `key_extractor` was not set, or if neither a resolver nor
    /// a cache manager was set.
    pub fn cacheable(self) -> CacheableLayer<Req, K, V> {
        let (config, key_extractor) = self.into_keyed_config();
        CacheableLayer::new(config, key_extractor)
    }

    /// Builds a write-through layer.
    ///
    /// # Panics
    ///
    /// Same as [`cacheable`](Self::cacheable).
    pub fn put(self) -> CachePutLayer<Req, K, V> {
        let (config, key_extractor) = self.into_keyed_config();
        CachePutLayer::new(config, key_extractor)
    }

    /// Builds an eviction layer.
    ///
    /// # Panics
    ///
    /// Panics if neither a resolver nor a cache manager was set, or if
    /// `key_extractor` was not set for a single-key eviction.
    pub fn evict(mut self) -> CacheEvictLayer<Req, K, V> {
        let target = if self.all_entries {
            EvictTarget::AllEntries
        } else {
            EvictTarget::Key(
                self.key_extractor
                    .take()
                    .expect("key_extractor must be set unless all_entries is enabled"),
            )
        };
        let before_invocation = self.before_invocation;
        CacheEvictLayer::new(self.into_config(), target, before_invocation)
    }

    fn into_keyed_config(mut self) -> (CacheOperationConfig<Req, K, V>, KeyExtractor<Req, K>) {
        let key_extractor = self
            .key_extractor
            .take()
            .expect("key_extractor must be set before building");
        (self.into_config(), key_extractor)
    }

    fn into_config(self) -> CacheOperationConfig<Req, K, V> {
        let resolver: Arc<dyn CacheResolver<Req, K, V>> = match (self.resolver, self.cache_manager) {
            (Some(resolver), _) => resolver,
            (None, Some(manager)) => Arc::new(NamedCacheResolver::new(manager, self.cache_names)),
            (None, None) => {
                panic!("either a resolver or a cache_manager must be set before building")
            }
        };

        CacheOperationConfig {
            name: self.name,
            resolver,
            condition: self.condition,
            event_listeners: self.event_listeners,
        }
    }
}

impl<Req, K, V> Default for CacheOperationBuilder<Req, K, V>
where
    Req: 'static,
    K: 'static,
    V: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
