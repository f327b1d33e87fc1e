//! Test organization:
//! - fixture.rs: shared context setup and hit/miss assertions
//! - book_repository.rs: read-through, write-through and eviction scenarios
//! - cache_resolution.rs: per-call region selection
//! - failures.rs: errors propagate and are never cached


mod book_repository;
mod cache_resolution;
mod failures;
