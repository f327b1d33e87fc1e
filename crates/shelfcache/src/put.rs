//! Write-through caching: always invoke, then store the result.

use crate::config::{CacheOperationBuilder, CacheOperationConfig, KeyExtractor};
use crate::error::CacheError;
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// A Tower [`Layer`] that writes every successful response into the resolved
/// regions, replacing what they held for the key.
///
/// Built with [`CacheOperationBuilder::put`].
pub struct CachePutLayer<Req, K, V> {
    config: Arc<CacheOperationConfig<Req, K, V>>,
    key_extractor: KeyExtractor<Req, K>,
}

impl<Req, K, V> CachePutLayer<Req, K, V>
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

    /// Creates a new builder for configuring a put layer.
    pub fn builder() -> CacheOperationBuilder<Req, K, V> {
        CacheOperationBuilder::new()
    }
}

impl<Req, K, V> Clone for CachePutLayer<Req, K, V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            key_extractor: Arc::clone(&self.key_extractor),
        }
    }
}

impl<S, Req, K, V> Layer<S> for CachePutLayer<Req, K, V>
where
    S: Service<Req, Response = V>,
{
    type Service = CachePut<S, Req, K, V>;

    fn layer(&self, service: S) -> Self::Service {
        CachePut {
            inner: service,
            config: Arc::clone(&self.config),
            key_extractor: Arc::clone(&self.key_extractor),
        }
    }
}

/// A Tower [`Service`] that never short-circuits: the inner service always
/// runs, and its successful response is cached under the request's key.
pub struct CachePut<S, Req, K, V> {
    inner: S,
    config: Arc<CacheOperationConfig<Req, K, V>>,
    key_extractor: KeyExtractor<Req, K>,
}

impl<S, Req, K, V> Clone for CachePut<S, Req, K, V>
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

impl<S, Req, K, V> Service<Req> for CachePut<S, Req, K, V>
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

        #[cfg(feature = "tracing")]
        let operation = self.config.name.clone();

        let future = self.inner.call(req);
        Box::pin(async move {
            let value = future.await.map_err(CacheError::Inner)?;

            #[cfg(feature = "tracing")]
            debug!(operation = %operation, regions = caches.len(), "Writing through to cache");

            for cache in &caches {
                cache.put(key.clone(), value.clone());
            }
            Ok(value)
        })
    }
}
