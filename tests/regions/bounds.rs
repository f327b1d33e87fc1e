use bookshelf::{BookshelfConfig, BookshelfContext};
use shelfcache::EvictionPolicy;
use std::time::Duration;

#[tokio::test]
async fn bounded_default_region_evicts_least_recently_used() {
    let config = BookshelfConfig::builder()
        .max_entries(2)
        .eviction_policy(EvictionPolicy::Lru)
        .build()
        .unwrap();
    let context = BookshelfContext::new(config).unwrap();
    let repository = context.repository();
    let region = context.default_cache().unwrap();

    repository.find_book(1).await.unwrap();
    repository.find_book(2).await.unwrap();
    // touch 1 so 2 becomes the eviction candidate
    repository.find_book(1).await.unwrap();
    repository.find_book(3).await.unwrap();

    assert_eq!(region.len(), 2);
    assert!(region.get(&1).is_some());
    assert!(region.get(&2).is_none());
    assert!(region.get(&3).is_some());
}

#[tokio::test]
async fn bounded_default_region_evicts_oldest_with_fifo() {
    let config = BookshelfConfig::builder()
        .max_entries(2)
        .eviction_policy(EvictionPolicy::Fifo)
        .build()
        .unwrap();
    let context = BookshelfContext::new(config).unwrap();
    let repository = context.repository();
    let region = context.default_cache().unwrap();

    repository.find_book(1).await.unwrap();
    repository.find_book(2).await.unwrap();
    repository.find_book(1).await.unwrap();
    repository.find_book(3).await.unwrap();

    assert!(region.get(&1).is_none());
    assert!(region.get(&2).is_some());
    assert!(region.get(&3).is_some());
}

#[tokio::test]
async fn evicted_entry_reads_through_again() {
    let config = BookshelfConfig::builder().max_entries(1).build().unwrap();
    let context = BookshelfContext::new(config).unwrap();
    let repository = context.repository();

    repository.find_book(1).await.unwrap();
    repository.find_book(2).await.unwrap();
    repository.find_book(1).await.unwrap();

    assert_eq!(context.book_store().lookups(), 3);
}

#[tokio::test]
async fn expired_entries_read_as_misses() {
    let config = BookshelfConfig::builder().ttl_secs(1).build().unwrap();
    let context = BookshelfContext::new(config).unwrap();
    let repository = context.repository();
    let region = context.default_cache().unwrap();

    repository.find_book(1).await.unwrap();
    assert!(region.get(&1).is_some());

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert!(region.get(&1).is_none());
    repository.find_book(1).await.unwrap();
    assert_eq!(context.book_store().lookups(), 2);
}
