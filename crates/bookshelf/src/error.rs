//! Error types for the book repository.

use shelfcache::CacheError;

/// Errors raised by the backing book store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// The book passed to an update does not carry the id it is stored under.
    #[error("book id {book_id} does not match the id {path_id} it is stored under")]
    IdMismatch { path_id: u64, book_id: u64 },
}

/// Errors returned by [`BookRepository`](crate::BookRepository) calls.
pub type RepositoryError = CacheError<BookError>;

/// Invalid [`BookshelfConfig`](crate::BookshelfConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one cache name must be configured")]
    NoCacheNames,

    #[error("default cache '{0}' is not one of the configured cache names")]
    UnknownDefaultCache(String),

    #[error("max_entries must be greater than zero")]
    ZeroCapacity,
}
