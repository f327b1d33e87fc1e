//! Read-through caching of a service's responses.

use crate::config::{CacheOperationBuilder, CacheOperationConfig, KeyExtractor};
use crate::error::CacheError;
use crate::events::CacheEvent;
use crate::value::ValueWrapper;
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// A Tower [`Layer`] that serves responses from cache regions and fills them
/// on a miss.
///
/// Built with [`CacheOperationBuilder::cacheable`].
pub struct CacheableLayer<Req, K, V> {
    config: Arc<CacheOperationConfig<Req, K, V>>,
    key_extractor: KeyExtractor<Req, K>,
}

impl<Req, K, V> CacheableLayer<Req, K, V>
where
    Req: 'static,
    K: 'static,
    V: 'static,
{
    pub(crate) fn new(config: CacheOperationConfig<Req, K, V>, key_extractor: KeyExtractor<Req, K>) -> Self {
        Self {
            config: Arc::new(config),
            key_extractor,
        }
    }

    /// Creates a new builder for configuring a cacheable layer.
    pub fn builder() -> CacheOperationBuilder<Req, K, V> {
        CacheOperationBuilder::new()
    }

    pub fn config(&self) -> &CacheOperationConfig<Req, K, V> {
        &self.config
    }
}

impl<Req, K, V> Clone for CacheableLayer<Req, K, V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            key_extractor: Arc::clone(&self.key_extractor),
        }
    }
}

impl<S, Req, K, V> Layer<S> for CacheableLayer<Req, K, V>
where
    S: Service<Req, Response = V>,
{
    type Service = Cacheable<S, Req, K, V>;

    fn layer(&self, service: S) -> Self::Service {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "cache_requests_total",
            "Total number of cacheable requests (hits and misses)"
        );

        Cacheable {
            inner: service,
            config: Arc::clone(&self.config),
            key_extractor: Arc::clone(&self.key_extractor),
        }
    }
}

/// A Tower [`Service`] that answers from the first resolved region holding
/// the key, and otherwise calls the inner service and stores its successful
/// response in every resolved region.
///
/// A cached absence counts as a miss here, since the response type has no
/// way to express it. Errors are never cached.
pub struct Cacheable<S, Req, K, V> {
    inner: S,
    config: Arc<CacheOperationConfig<Req, K, V>>,
    key_extractor: KeyExtractor<Req, K>,
}

impl<S, Req, K, V> Clone for Cacheable<S, Req, K, V>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
            key_extractor: Arc::clone(&self.key_extractor),
        }
    }
}

impl<S, Req, K, V> Service<Req> for Cacheable<S, Req, K, V>
where
    S: Service<Req, Response = V>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    K: Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    type Response = V;
    type Error = CacheError<S::Error>;
    type Future = BoxFuture<'static, Result<V, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(CacheError::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        if !self.config.applies(&req) {
            let future = self.inner.call(req);
            return Box::pin(async move { future.await.map_err(CacheError::Inner) });
        }

        let caches = match self.config.resolver.resolve(&req) {
            Ok(caches) => caches,
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(operation = %self.config.name, error = %err, "Cache resolution failed");

                return Box::pin(future::ready(Err(CacheError::Resolve(err))));
            }
        };
        let key = (self.key_extractor)(&req);
        let operation = self.config.name.clone();

        for cache in &caches {
            if let Some(value) = cache.get(&key).and_then(ValueWrapper::into_inner) {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => operation.clone(), "result" => "hit")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(operation = %operation, cache = %cache.name(), "Cache hit");

                self.config.event_listeners.emit(&CacheEvent::Hit {
                    operation,
                    cache_name: cache.name().to_string(),
                    timestamp: Instant::now(),
                });
                return Box::pin(future::ready(Ok(value)));
            }
        }

        #[cfg(feature = "metrics")]
        counter!("cache_requests_total", "cache" => operation.clone(), "result" => "miss")
            .increment(1);

        #[cfg(feature = "tracing")]
        debug!(operation = %operation, "Cache miss");

        self.config.event_listeners.emit(&CacheEvent::Miss {
            operation,
            timestamp: Instant::now(),
        });

        let future = self.inner.call(req);
        Box::pin(async move {
            let value = future.await.map_err(CacheError::Inner)?;
            for cache in &caches {
                cache.put(key.clone(), value.clone());
            }
            Ok(value)
        })
    }
}
