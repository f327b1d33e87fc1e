//! Failures surface to the caller and never touch the cache.

use super::fixture::RepositoryFixture;
use bookshelf::{Book, BookError, BookshelfConfig};

#[tokio::test]
async fn rejected_update_keeps_cached_book() {
    let fixture = RepositoryFixture::new();
    let key = fixture.generate_key(1);
    let original = fixture.repository().find_book(1).await.unwrap();

    let err = fixture
        .repository()
        .update_book(1, Book::new(2, "Wrong id"))
        .await
        .unwrap_err();

    assert_eq!(
        err.into_inner(),
        Some(BookError::IdMismatch {
            path_id: 1,
            book_id: 2
        })
    );
    fixture.assert_default_cache_hit(key, &original);
}

#[tokio::test]
async fn rejected_update_does_not_populate() {
    let fixture = RepositoryFixture::new();

    let result = fixture
        .repository()
        .update_book(3, Book::new(4, "Wrong id"))
        .await;

    assert!(result.is_err());
    fixture.assert_default_cache_miss(fixture.generate_key(3));
    fixture.assert_default_cache_miss(fixture.generate_key(4));
}

#[tokio::test]
async fn custom_default_region_is_honoured() {
    let config = BookshelfConfig::builder()
        .cache_names(["books", "archive"])
        .default_cache("books")
        .build()
        .unwrap();
    let fixture = RepositoryFixture::with_config(config);

    let book = fixture.repository().find_book(1).await.unwrap();

    assert_eq!(fixture.default_cache.name(), "books");
    fixture.assert_default_cache_hit(1, &book);
    assert!(fixture.is_empty("archive"));
    assert!(fixture
        .repository()
        .find_book_in(1, "default")
        .await
        .unwrap_err()
        .is_resolve());
}
