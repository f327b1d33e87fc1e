//! Named cache regions and cache-operation middleware for Tower services.
//!
//! The pieces fit together like this:
//!
//! - a [`Cache`] is one named region of key/value entries;
//!   [`ConcurrentMapCache`] is the in-memory implementation
//! - a [`CacheManager`] hands regions out by name;
//!   [`ConcurrentMapCacheManager`] is static (fixed names) or dynamic
//!   (regions created on demand)
//! - a [`CacheResolver`] picks the regions for one invocation, either fixed
//!   ([`NamedCacheResolver`]) or derived from the request
//!   ([`RuntimeCacheResolver`])
//! - three layers wrap a service with a cache operation:
//!   [`CacheableLayer`] (read-through), [`CachePutLayer`] (write-through) and
//!   [`CacheEvictLayer`] (single-key or whole-region eviction)
//!
//! # Features
//!
//! - **Eviction Policies**: LRU, LFU and FIFO for bounded regions
//! - **TTL Support**: Optional time-to-live for entries
//! - **Event System**: Hit, Miss, Put, Evict, Clear and Eviction events
//! - `tracing`: structured logs for every operation
//! - `metrics`: request, put and eviction counters plus a region size gauge
//!
//! # Examples
//!
//! ```
//! use shelfcache::{Cache, CacheManager, CacheableLayer, ConcurrentMapCacheManager, SharedCacheManager};
//! use std::sync::Arc;
//! use tower::{Service, ServiceBuilder, ServiceExt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager: SharedCacheManager<u64, String> = Arc::new(
//!     ConcurrentMapCacheManager::<u64, String>::builder()
//!         .cache_names(["default"])
//!         .build(),
//! );
//!
//! let find = CacheableLayer::builder()
//!     .name("find")
//!     .cache_manager(Arc::clone(&manager))
//!     .cache_names(["default"])
//!     .key_extractor(|id: &u64| *id)
//!     .cacheable();
//!
//! let mut service = ServiceBuilder::new()
//!     .layer(find)
//!     .service(tower::service_fn(|id: u64| async move {
//!         Ok::<_, std::io::Error>(format!("Book #{}", id))
//!     }));
//!
//! let title = service.ready().await?.call(1).await?;
//! assert_eq!(title, "Book #1");
//! assert!(manager.get_cache("default").unwrap().get(&1).is_some());
//! # Ok(())
//! # }
//! ```

mod cacheable;
mod config;
mod error;
mod events;
mod evict;
mod eviction;
mod manager;
mod put;
mod region;
mod resolver;
mod store;
mod value;

pub use cacheable::{Cacheable, CacheableLayer};
pub use config::{CacheOperationBuilder, CacheOperationConfig, Condition, KeyExtractor};
pub use error::{CacheError, ResolveError};
pub use events::CacheEvent;
pub use evict::{CacheEvict, CacheEvictLayer, EvictTarget};
pub use eviction::EvictionPolicy;
pub use manager::{CacheManager, ConcurrentMapCacheManager, ConcurrentMapCacheManagerBuilder};
pub use put::{CachePut, CachePutLayer};
pub use region::{Cache, ConcurrentMapCache, RegionConfig};
pub use resolver::{
    CacheResolver, NameExtractor, NamedCacheResolver, ResolvedCaches, RuntimeCacheResolver,
    SharedCacheManager,
};
pub use value::ValueWrapper;
