//! Region metrics

use super::helpers::*;
use bookshelf::{Book, BookshelfConfig, BookshelfContext};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn puts_and_size_are_recorded_per_region() {
    init_recorder();

    let context = BookshelfContext::with_defaults();
    let repository = context.repository();
    repository.find_book(1).await.unwrap();
    repository
        .update_book(1, Book::new(1, "Another title"))
        .await
        .unwrap();

    assert_counter_exists("cache_puts_total");
    assert_metric_has_label("cache_puts_total", "cache", "default");
    assert_gauge_exists("cache_size");
    assert_metric_has_label("cache_size", "cache", "default");
}

#[tokio::test]
#[serial]
async fn capacity_evictions_are_counted() {
    init_recorder();

    let config = BookshelfConfig::builder()
        .cache_names(["bounded"])
        .default_cache("bounded")
        .max_entries(2)
        .build()
        .unwrap();
    let context = BookshelfContext::new(config).unwrap();

    for id in 0..5 {
        context.repository().find_book(id).await.unwrap();
    }

    assert_counter_exists("cache_evictions_total");
    assert_metric_has_label("cache_evictions_total", "cache", "bounded");
}
