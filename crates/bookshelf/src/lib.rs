//! A book repository cached through named shelfcache regions.
//!
//! [`BookshelfContext`] wires a [`BookStore`], a static cache manager with
//! the configured regions and a [`BookRepository`] whose methods read
//! through, write through and evict from those regions.
//!
//! ```
//! use bookshelf::{Book, BookshelfContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = BookshelfContext::with_defaults();
//! let repository = context.repository();
//! let default = context.default_cache().unwrap();
//!
//! assert!(default.get(&1).is_none());
//! let book = repository.find_book(1).await?;
//! assert_eq!(default.get(&1).and_then(|w| w.into_inner()), Some(book));
//!
//! let renamed = Book::new(1, "Another title");
//! repository.update_book(1, renamed.clone()).await?;
//! assert_eq!(default.get(&1).and_then(|w| w.into_inner()), Some(renamed));
//!
//! assert!(repository.remove_book(1).await?);
//! assert!(default.get(&1).is_none());
//! # Ok(())
//! # }
//! ```

mod book;
mod config;
mod context;
mod error;
mod repository;
mod store;

pub use book::Book;
pub use config::{BookshelfConfig, BookshelfConfigBuilder, ANOTHER_CACHE, DEFAULT_CACHE};
pub use context::BookshelfContext;
pub use error::{BookError, ConfigError, RepositoryError};
pub use repository::{BookRepository, FindBookIn, UpdateBook};
pub use store::{BookStore, DEFAULT_TITLE};
