//! Cache resolution: choosing the regions an invocation works on.

use crate::error::ResolveError;
use crate::manager::CacheManager;
use crate::region::Cache;
use std::sync::Arc;

/// Regions resolved for one invocation, in lookup order.
pub type ResolvedCaches<K, V> = Vec<Arc<dyn Cache<K, V>>>;

/// A shared cache manager.
pub type SharedCacheManager<K, V> = Arc<dyn CacheManager<K, V>>;

/// Picks the regions a cache operation applies to for a given request.
pub trait CacheResolver<Req, K, V>: Send + Sync {
    fn resolve(&self, req: &Req) -> Result<ResolvedCaches<K, V>, ResolveError>;
}

fn lookup<K, V, I, S>(manager: &dyn CacheManager<K, V>, names: I) -> Result<ResolvedCaches<K, V>, ResolveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let caches = names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            manager
                .get_cache(name)
                .ok_or_else(|| ResolveError::UnknownCache {
                    name: name.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if caches.is_empty() {
        return Err(ResolveError::NoCacheResolved);
    }
    Ok(caches)
}

/// Resolves the same, fixed region names for every request.
pub struct NamedCacheResolver<K, V> {
    manager: SharedCacheManager<K, V>,
    names: Vec<String>,
}

impl<K, V> NamedCacheResolver<K, V> {
    pub fn new<I, S>(manager: SharedCacheManager<K, V>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manager,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<Req, K, V> CacheResolver<Req, K, V> for NamedCacheResolver<K, V>
where
    K: 'static,
    V: 'static,
{
    fn resolve(&self, _req: &Req) -> Result<ResolvedCaches<K, V>, ResolveError> {
        lookup(self.manager.as_ref(), &self.names)
    }
}

/// Function that derives region names from a request.
pub type NameExtractor<Req> = Arc<dyn Fn(&Req) -> Vec<String> + Send + Sync>;

/// Resolves region names from each request, so callers choose the region
/// per invocation.
///
/// # Examples
///
/// ```
/// use shelfcache::{
///     CacheResolver, ConcurrentMapCacheManager, RuntimeCacheResolver, SharedCacheManager,
/// };
/// use std::sync::Arc;
///
/// struct Lookup {
///     region: String,
/// }
///
/// let manager: SharedCacheManager<u64, String> = Arc::new(
///     ConcurrentMapCacheManager::<u64, String>::builder()
///         .cache_names(["default", "another"])
///         .build(),
/// );
/// let resolver = RuntimeCacheResolver::new(manager, |req: &Lookup| vec![req.region.clone()]);
///
/// let caches = resolver
///     .resolve(&Lookup { region: "another".into() })
///     .unwrap();
/// assert_eq!(caches[0].name(), "another");
/// ```
pub struct RuntimeCacheResolver<Req, K, V> {
    manager: SharedCacheManager<K, V>,
    names: NameExtractor<Req>,
}

impl<Req, K, V> RuntimeCacheResolver<Req, K, V> {
    pub fn new<F>(manager: SharedCacheManager<K, V>, names: F) -> Self
    where
        F: Fn(&Req) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            manager,
            names: Arc::new(names),
        }
    }
}

impl<Req, K, V> CacheResolver<Req, K, V> for RuntimeCacheResolver<Req, K, V>
where
    K: 'static,
    V: 'static,
{
    fn resolve(&self, req: &Req) -> Result<ResolvedCaches<K, V>, ResolveError> {
        lookup(self.manager.as_ref(), (self.names)(req))
    }
}
