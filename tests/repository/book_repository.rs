//! Read-through, write-through and eviction through the default region.

use super::fixture::RepositoryFixture;
use bookshelf::{Book, DEFAULT_TITLE};

#[tokio::test]
async fn get() {
    let fixture = RepositoryFixture::new();
    let key = fixture.generate_key(0);

    fixture.assert_default_cache_miss(key);
    let book = fixture.repository().find_book(0).await.unwrap();
    fixture.assert_default_cache_hit(key, &book);
}

#[tokio::test]
async fn second_find_is_a_hit_with_the_same_value() {
    let fixture = RepositoryFixture::new();
    let store = fixture.context.book_store();

    let first = fixture.repository().find_book(0).await.unwrap();
    let second = fixture.repository().find_book(0).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, Book::new(0, DEFAULT_TITLE));
    assert_eq!(store.lookups(), 1);
}

#[tokio::test]
async fn put() {
    let fixture = RepositoryFixture::new();
    let key = fixture.generate_key(1);

    let book = fixture.repository().find_book(1).await.unwrap();
    fixture.assert_default_cache_hit(key, &book);

    let updated = Book::new(1, "Another title");
    let stored = fixture
        .repository()
        .update_book(1, updated.clone())
        .await
        .unwrap();

    assert_eq!(stored, updated);
    fixture.assert_default_cache_hit(key, &updated);
}

#[tokio::test]
async fn find_after_put_returns_updated_book_without_lookup() {
    let fixture = RepositoryFixture::new();
    let store = fixture.context.book_store();

    fixture.repository().find_book(1).await.unwrap();
    let updated = Book::new(1, "Another title");
    fixture
        .repository()
        .update_book(1, updated.clone())
        .await
        .unwrap();

    let found = fixture.repository().find_book(1).await.unwrap();
    assert_eq!(found, updated);
    assert_eq!(store.lookups(), 1);
}

#[tokio::test]
async fn put_populates_a_cold_key() {
    let fixture = RepositoryFixture::new();
    let key = fixture.generate_key(8);
    fixture.assert_default_cache_miss(key);

    let book = Book::new(8, "Written first");
    fixture
        .repository()
        .update_book(8, book.clone())
        .await
        .unwrap();

    fixture.assert_default_cache_hit(key, &book);
}

#[tokio::test]
async fn evict() {
    let fixture = RepositoryFixture::new();
    let key = fixture.generate_key(2);

    let book = fixture.repository().find_book(2).await.unwrap();
    fixture.assert_default_cache_hit(key, &book);

    assert!(fixture.repository().remove_book(2).await.unwrap());
    fixture.assert_default_cache_miss(key);
}

#[tokio::test]
async fn evict_leaves_other_keys() {
    let fixture = RepositoryFixture::new();

    let kept = fixture.repository().find_book(5).await.unwrap();
    fixture.repository().find_book(6).await.unwrap();

    fixture.repository().remove_book(6).await.unwrap();

    fixture.assert_default_cache_miss(fixture.generate_key(6));
    fixture.assert_default_cache_hit(fixture.generate_key(5), &kept);
}

#[tokio::test]
async fn removing_an_unknown_book_reports_false() {
    let fixture = RepositoryFixture::new();
    assert!(!fixture.repository().remove_book(42).await.unwrap());
}

#[tokio::test]
async fn evict_all() {
    let fixture = RepositoryFixture::new();

    fixture.repository().find_book(3).await.unwrap();
    fixture.repository().find_book(4).await.unwrap();

    assert!(!fixture.is_empty("default"), "Cache is not empty");
    fixture.repository().remove_all().await.unwrap();
    assert!(fixture.is_empty("default"), "Cache should be empty");
    assert!(!fixture.context.book_store().contains(3));
}

#[tokio::test]
async fn evict_all_leaves_other_regions() {
    let fixture = RepositoryFixture::new();

    fixture.repository().find_book(3).await.unwrap();
    fixture.repository().find_book_in(4, "another").await.unwrap();

    fixture.repository().remove_all().await.unwrap();

    assert!(fixture.is_empty("default"));
    assert!(!fixture.is_empty("another"));
}

#[tokio::test]
async fn contexts_do_not_share_state() {
    let first = RepositoryFixture::new();
    first.repository().find_book(0).await.unwrap();

    let second = RepositoryFixture::new();
    second.assert_default_cache_miss(second.generate_key(0));
    assert_eq!(second.context.book_store().lookups(), 0);
}
