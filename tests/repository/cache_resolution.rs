//! Per-call region selection.

use super::fixture::{assert_cache_hit, assert_cache_miss, RepositoryFixture};
use shelfcache::{CacheError, ResolveError};

#[tokio::test]
async fn get_with_custom_cache_resolver() {
    let fixture = RepositoryFixture::new();
    let default_cache = fixture.cache("default");
    let another_cache = fixture.cache("another");

    let key = fixture.generate_key(0);
    assert_cache_miss(key, &[&default_cache, &another_cache]);
    let book = fixture
        .repository()
        .find_book_in(0, "default")
        .await
        .unwrap();
    assert_cache_hit(key, &book, &[&default_cache]);
    assert_cache_miss(key, &[&another_cache]);

    let key2 = fixture.generate_key(1);
    assert_cache_miss(key2, &[&default_cache, &another_cache]);
    let book2 = fixture
        .repository()
        .find_book_in(1, "another")
        .await
        .unwrap();
    assert_cache_hit(key2, &book2, &[&another_cache]);
    assert_cache_miss(key2, &[&default_cache]);
}

#[tokio::test]
async fn each_region_reads_through_independently() {
    let fixture = RepositoryFixture::new();
    let store = fixture.context.book_store();

    fixture.repository().find_book_in(7, "default").await.unwrap();
    fixture.repository().find_book_in(7, "default").await.unwrap();
    assert_eq!(store.lookups(), 1);

    // same key, different region: a miss there
    fixture.repository().find_book_in(7, "another").await.unwrap();
    assert_eq!(store.lookups(), 2);

    assert_cache_hit(
        7,
        &fixture.repository().find_book(7).await.unwrap(),
        &[&fixture.cache("default"), &fixture.cache("another")],
    );
    assert_eq!(store.lookups(), 2);
}

#[tokio::test]
async fn find_book_shares_the_default_region() {
    let fixture = RepositoryFixture::new();
    let store = fixture.context.book_store();

    let cached = fixture
        .repository()
        .find_book_in(9, "default")
        .await
        .unwrap();
    let found = fixture.repository().find_book(9).await.unwrap();

    assert_eq!(cached, found);
    assert_eq!(store.lookups(), 1);
}

#[tokio::test]
async fn unknown_region_is_rejected_before_the_store() {
    let fixture = RepositoryFixture::new();

    let err = fixture
        .repository()
        .find_book_in(0, "missing")
        .await
        .unwrap_err();

    match err {
        CacheError::Resolve(ResolveError::UnknownCache { name }) => assert_eq!(name, "missing"),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(fixture.context.book_store().lookups(), 0);
    assert!(fixture.is_empty("default"));
    assert!(fixture.is_empty("another"));
}

#[test]
#[should_panic(expected = "region 'archve' must exist")]
fn emptiness_check_rejects_unknown_region() {
    let fixture = RepositoryFixture::new();
    let _ = fixture.is_empty("archve");
}
