//! Core infrastructure for shelfcache.
//!
//! Everything in here is shared between the cache regions, the cache manager
//! and the tower layers that drive cache operations:
//! - [`Event`], the trait every observable cache event implements
//! - [`EventListeners`], a panic-isolated fan-out of listeners
//! - [`FnListener`], a closure adapter

pub mod events;

pub use events::{BoxedEventListener, Event, EventListener, EventListeners, FnListener};
