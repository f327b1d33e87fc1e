//! Wiring of the store, the cache manager and the repository.

use crate::book::Book;
use crate::config::BookshelfConfig;
use crate::error::ConfigError;
use crate::repository::BookRepository;
use crate::store::BookStore;
use shelfcache::{Cache, CacheManager, ConcurrentMapCacheManager, SharedCacheManager};
use std::sync::Arc;
use tracing::info;

/// Everything a caller needs, built from one [`BookshelfConfig`].
///
/// A context owns its regions: building a new context starts from empty
/// caches and an empty store, and dropping it tears both down.
///
/// # Examples
///
/// ```
/// use bookshelf::BookshelfContext;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = BookshelfContext::with_defaults();
/// let book = context.repository().find_book(0).await?;
///
/// let cached = context.cache_manager().get_cache("default").unwrap().get(&0);
/// assert_eq!(cached.and_then(|w| w.into_inner()), Some(book));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BookshelfContext {
    config: BookshelfConfig,
    store: BookStore,
    regions: Arc<ConcurrentMapCacheManager<u64, Book>>,
    repository: BookRepository,
}

impl BookshelfContext {
    /// Validates `config` and builds a fresh context.
    pub fn new(config: BookshelfConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    /// A context with the default configuration.
    pub fn with_defaults() -> Self {
        Self::assemble(BookshelfConfig::default())
    }

    fn assemble(config: BookshelfConfig) -> Self {
        let mut manager = ConcurrentMapCacheManager::<u64, Book>::builder()
            .cache_names(config.cache_names.iter().cloned())
            .eviction_policy(config.eviction_policy)
            .allow_absent_values(config.allow_absent_values);
        if let Some(max) = config.max_entries {
            manager = manager.max_size(max);
        }
        if let Some(ttl) = config.ttl() {
            manager = manager.ttl(ttl);
        }
        let regions = Arc::new(manager.build());

        let store = BookStore::with_settings(config.default_title.as_str(), config.lookup_delay());
        let shared: SharedCacheManager<u64, Book> = regions.clone();
        let repository = BookRepository::new(store.clone(), shared, &config.default_cache);

        info!(
            caches = ?config.cache_names,
            default_cache = %config.default_cache,
            "Bookshelf context ready"
        );

        Self {
            config,
            store,
            regions,
            repository,
        }
    }

    pub fn repository(&self) -> &BookRepository {
        &self.repository
    }

    /// The cache manager, as the repository sees it.
    pub fn cache_manager(&self) -> SharedCacheManager<u64, Book> {
        self.regions.clone()
    }

    /// The concrete cache manager, for access to the native regions.
    pub fn regions(&self) -> &Arc<ConcurrentMapCacheManager<u64, Book>> {
        &self.regions
    }

    /// The region the fixed repository operations use.
    pub fn default_cache(&self) -> Option<Arc<dyn Cache<u64, Book>>> {
        self.regions.get_cache(&self.config.default_cache)
    }

    pub fn book_store(&self) -> &BookStore {
        &self.store
    }

    pub fn config(&self) -> &BookshelfConfig {
        &self.config
    }
}

impl Default for BookshelfContext {
    fn default() -> Self {
        Self::with_defaults()
    }
}
