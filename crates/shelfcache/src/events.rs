//! Events emitted by cache regions and cache operations.

use shelfcache_core::Event;
use std::time::Instant;

/// Events emitted by the cache framework.
///
/// `Hit` and `Miss` come from the cacheable operation layer, the rest come
/// from the regions themselves.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A region answered a cacheable invocation.
    Hit {
        /// Name of the operation layer.
        operation: String,
        /// Region that held the entry.
        cache_name: String,
        timestamp: Instant,
    },
    /// No resolved region held the key; the wrapped service was invoked.
    Miss {
        /// Name of the operation layer.
        operation: String,
        timestamp: Instant,
    },
    /// An entry was written to a region.
    Put {
        cache_name: String,
        timestamp: Instant,
    },
    /// An entry was explicitly evicted from a region.
    Evict {
        cache_name: String,
        timestamp: Instant,
    },
    /// A region was cleared.
    Clear {
        cache_name: String,
        /// Number of entries dropped.
        cleared: usize,
        timestamp: Instant,
    },
    /// An entry was dropped to respect the region's size bound.
    Eviction {
        cache_name: String,
        timestamp: Instant,
    },
}

impl Event for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "cache_hit",
            CacheEvent::Miss { .. } => "cache_miss",
            CacheEvent::Put { .. } => "cache_put",
            CacheEvent::Evict { .. } => "cache_evict",
            CacheEvent::Clear { .. } => "cache_clear",
            CacheEvent::Eviction { .. } => "cache_eviction",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Put { timestamp, .. }
            | CacheEvent::Evict { timestamp, .. }
            | CacheEvent::Clear { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. } => *timestamp,
        }
    }

    fn source_name(&self) -> &str {
        match self {
            CacheEvent::Miss { operation, .. } => operation,
            CacheEvent::Hit { cache_name, .. }
            | CacheEvent::Put { cache_name, .. }
            | CacheEvent::Evict { cache_name, .. }
            | CacheEvent::Clear { cache_name, .. }
            | CacheEvent::Eviction { cache_name, .. } => cache_name,
        }
    }
}
