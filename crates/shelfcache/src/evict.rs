//! Cache eviction driven by service calls.

use crate::config::{CacheOperationBuilder, CacheOperationConfig, KeyExtractor};
use crate::error::CacheError;
use crate::resolver::ResolvedCaches;
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// What an eviction removes.
pub enum EvictTarget<Req, K> {
    /// The entry for the request's key.
    Key(KeyExtractor<Req, K>),
    /// Every entry in the resolved regions.
    AllEntries,
}

impl<Req, K> Clone for EvictTarget<Req, K> {
    fn clone(&self) -> Self {
        match self {
            EvictTarget::Key(extractor) => EvictTarget::Key(Arc::clone(extractor)),
            EvictTarget::AllEntries => EvictTarget::AllEntries,
        }
    }
}

/// A Tower [`Layer`] that evicts from the resolved regions around a call.
///
/// Built with [`CacheOperationBuilder::evict`].
pub struct CacheEvictLayer<Req, K, V> {
    config: Arc<CacheOperationConfig<Req, K, V>>,
    target: EvictTarget<Req, K>,
    before_invocation: bool,
}

impl<Req, K, V> CacheEvictLayer<Req, K, V>
where
    Req: 'static,
    K: 'static,
    V: 'static,
{
    pub(crate) fn new(
        config: CacheOperationConfig<Req, K, V>,
        target: EvictTarget<Req, K>,
        before_invocation: bool,
    ) -> Self {
        Self {
            config: Arc::new(config),
            target,
            before_invocation,
        }
    }

    /// Creates a new builder for configuring an evict layer.
    pub fn builder() -> CacheOperationBuilder<Req, K, V> {
        CacheOperationBuilder::new()
    }
}

impl<Req, K, V> Clone for CacheEvictLayer<Req, K, V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            target: self.target.clone(),
            before_invocation: self.before_invocation,
        }
    }
}

impl<S, Req, K, V> Layer<S> for CacheEvictLayer<Req, K, V>
where
    S: Service<Req>,
{
    type Service = CacheEvict<S, Req, K, V>;

    fn layer(&self, service: S) -> Self::Service {
        CacheEvict {
            inner: service,
            config: Arc::clone(&self.config),
            target: self.target.clone(),
            before_invocation: self.before_invocation,
        }
    }
}

/// A Tower [`Service`] that evicts one key, or clears whole regions, when
/// the inner service succeeds.
///
/// With `before_invocation` the eviction runs first and happens even if the
/// inner service then fails.
pub struct CacheEvict<S, Req, K, V> {
    inner: S,
    config: Arc<CacheOperationConfig<Req, K, V>>,
    target: EvictTarget<Req, K>,
    before_invocation: bool,
}

impl<S, Req, K, V> Clone for CacheEvict<S, Req, K, V>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
            target: self.target.clone(),
            before_invocation: self.before_invocation,
        }
    }
}

fn apply<K, V>(caches: &ResolvedCaches<K, V>, key: Option<&K>) {
    for cache in caches {
        match key {
            Some(key) => {
                cache.evict(key);
            }
            None => cache.clear(),
        }
    }
}

impl<S, Req, K, V> Service<Req> for CacheEvict<S, Req, K, V>
where
    S: Service<Req>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
    K: Send + 'static,
    V: 'static,
{
    type Response = S::Response;
    type Error = CacheError<S::Error>;
    type Future = BoxFuture<'static, Result<S::Response, Self::Error>>;

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
        let key = match &self.target {
            EvictTarget::Key(extractor) => Some(extractor(&req)),
            EvictTarget::AllEntries => None,
        };

        #[cfg(feature = "tracing")]
        debug!(
            operation = %self.config.name,
            all_entries = key.is_none(),
            before_invocation = self.before_invocation,
            "Evicting from cache"
        );

        if self.before_invocation {
            apply(&caches, key.as_ref());
            let future = self.inner.call(req);
            return Box::pin(async move { future.await.map_err(CacheError::Inner) });
        }

        let future = self.inner.call(req);
        Box::pin(async move {
            let response = future.await.map_err(CacheError::Inner)?;
            apply(&caches, key.as_ref());
            Ok(response)
        })
    }
}
