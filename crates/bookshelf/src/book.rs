use serde::{Deserialize, Serialize};
use std::fmt;

/// A book, identified by its numeric id.
///
/// Books are values: an update replaces the cached book, it never mutates
/// one that was already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
}

impl Book {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book{{id={}, title='{}'}}", self.id, self.title)
    }
}
