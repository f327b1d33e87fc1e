//! Error types for cache operations.

use std::fmt;

/// Failure to pick the cache regions for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The cache manager has no region with this name.
    #[error("cannot find cache named '{name}'")]
    UnknownCache {
        /// The requested region name.
        name: String,
    },
    /// The resolver produced an empty region list.
    #[error("no cache could be resolved for the invocation")]
    NoCacheResolved,
}

/// Errors returned by the cache-operation services.
#[derive(Debug)]
pub enum CacheError<E> {
    /// The wrapped service returned an error. Nothing was cached.
    Inner(E),
    /// Cache regions could not be resolved. The wrapped service was not called.
    Resolve(ResolveError),
}

impl<E: fmt::Display> fmt::Display for CacheError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Inner(e) => write!(f, "inner service error: {}", e),
            CacheError::Resolve(e) => write!(f, "cache resolution failed: {}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for CacheError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Inner(e) => Some(e),
            CacheError::Resolve(e) => Some(e),
        }
    }
}

impl<E> From<ResolveError> for CacheError<E> {
    fn from(err: ResolveError) -> Self {
        CacheError::Resolve(err)
    }
}

impl<E> CacheError<E> {
    /// Returns the wrapped service error, if that is what this is.
    pub fn inner(&self) -> Option<&E> {
        match self {
            CacheError::Inner(e) => Some(e),
            CacheError::Resolve(_) => None,
        }
    }

    /// Converts into the wrapped service error, if that is what this is.
    pub fn into_inner(self) -> Option<E> {
        match self {
            CacheError::Inner(e) => Some(e),
            CacheError::Resolve(_) => None,
        }
    }

    /// Returns true if region resolution failed.
    pub fn is_resolve(&self) -> bool {
        matches!(self, CacheError::Resolve(_))
    }
}
