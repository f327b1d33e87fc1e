//! The backing data source the repository reads through.

use crate::book::Book;
use crate::error::BookError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Title given to books the store has never seen.
pub const DEFAULT_TITLE: &str = "Some book";

/// An in-memory book store.
///
/// Looking up an unknown id creates and stores a book with the default
/// title, so every lookup succeeds. Each lookup is counted, and may be
/// slowed down to make cache hits observable.
#[derive(Clone, Debug)]
pub struct BookStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    books: Mutex<HashMap<u64, Book>>,
    lookups: AtomicUsize,
    default_title: String,
    lookup_delay: Option<Duration>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_TITLE, None)
    }

    pub fn with_settings(default_title: impl Into<String>, lookup_delay: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                books: Mutex::new(HashMap::new()),
                lookups: AtomicUsize::new(0),
                default_title: default_title.into(),
                lookup_delay,
            }),
        }
    }

    fn books(&self) -> MutexGuard<'_, HashMap<u64, Book>> {
        self.inner.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up `id`, creating the book on first sight.
    pub async fn find(&self, id: u64) -> Book {
        if let Some(delay) = self.inner.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.lookups.fetch_add(1, Ordering::SeqCst);

        let book = self
            .books()
            .entry(id)
            .or_insert_with(|| Book::new(id, self.inner.default_title.as_str()))
            .clone();
        debug!(%book, "Loaded book from store");
        book
    }

    /// Stores `book` under `id`, replacing any previous book.
    pub fn update(&self, id: u64, book: Book) -> Result<Book, BookError> {
        if book.id != id {
            return Err(BookError::IdMismatch {
                path_id: id,
                book_id: book.id,
            });
        }
        self.books().insert(id, book.clone());
        debug!(%book, "Updated book in store");
        Ok(book)
    }

    /// Removes `id`. Returns whether the store held it.
    pub fn remove(&self, id: u64) -> bool {
        let removed = self.books().remove(&id).is_some();
        debug!(id, removed, "Removed book from store");
        removed
    }

    /// Removes every book. Returns how many there were.
    pub fn remove_all(&self) -> usize {
        let mut books = self.books();
        let count = books.len();
        books.clear();
        debug!(count, "Removed all books from store");
        count
    }

    pub fn contains(&self, id: u64) -> bool {
        self.books().contains_key(&id)
    }

    /// Number of [`find`](Self::find) calls served so far.
    pub fn lookups(&self) -> usize {
        self.inner.lookups.load(Ordering::SeqCst)
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
