//! Operation layer metrics

use super::helpers::*;
use bookshelf::BookshelfContext;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn find_book_records_hits_and_misses() {
    init_recorder();

    let context = BookshelfContext::with_defaults();
    let repository = context.repository();

    // miss, then hit
    repository.find_book(1).await.unwrap();
    repository.find_book(1).await.unwrap();

    assert_counter_exists("cache_requests_total");
    assert_metric_has_label("cache_requests_total", "cache", "find_book");
    assert_metric_has_label("cache_requests_total", "result", "hit");
    assert_metric_has_label("cache_requests_total", "result", "miss");
}

#[tokio::test]
#[serial]
async fn runtime_resolved_lookups_are_labelled_by_operation() {
    init_recorder();

    let context = BookshelfContext::with_defaults();
    context
        .repository()
        .find_book_in(2, "another")
        .await
        .unwrap();

    assert_metric_has_label("cache_requests_total", "cache", "find_book_in");
}
