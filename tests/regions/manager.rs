use shelfcache::{CacheEvent, CacheManager, ConcurrentMapCacheManager};
use shelfcache_core::Event;
use std::sync::{Arc, Mutex};

#[test]
fn static_manager_rejects_unknown_regions() {
    let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
        .cache_names(["default", "another"])
        .build();

    assert!(manager.get_cache("default").is_some());
    assert!(manager.get_cache("missing").is_none());
    assert_eq!(manager.cache_names(), vec!["another", "default"]);
}

#[test]
fn dynamic_manager_creates_regions_once() {
    let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::new();
    assert!(manager.cache_names().is_empty());

    let first = manager.get_cache("books").unwrap();
    first.put(1, "Some book".to_string());

    let second = manager.get_cache("books").unwrap();
    assert_eq!(
        second.get(&1).and_then(|w| w.into_inner()),
        Some("Some book".to_string())
    );
    assert_eq!(manager.cache_names(), vec!["books"]);
}

#[test]
fn regions_are_independent() {
    let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
        .cache_names(["default", "another"])
        .build();
    let default = manager.get_cache("default").unwrap();
    let another = manager.get_cache("another").unwrap();

    default.put(1, "one".to_string());
    another.put(2, "two".to_string());
    default.clear();

    assert!(default.is_empty());
    assert_eq!(another.len(), 1);
    assert!(another.get(&1).is_none());
}

#[test]
fn absent_values_follow_the_region_setting() {
    let allowing: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
        .cache_names(["default"])
        .build();
    let region = allowing.get_cache("default").unwrap();
    assert!(region.put_absent(1));
    assert!(region.get(&1).unwrap().is_absent());

    let rejecting: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
        .cache_names(["default"])
        .allow_absent_values(false)
        .build();
    let region = rejecting.get_cache("default").unwrap();
    assert!(!region.put_absent(1));
    assert!(region.get(&1).is_none());
}

#[test]
fn put_if_absent_keeps_the_first_value() {
    let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::new();
    let region = manager.get_cache("default").unwrap();

    assert!(region.put_if_absent(1, "first".to_string()).is_none());
    let existing = region.put_if_absent(1, "second".to_string()).unwrap();

    assert_eq!(existing.get().map(String::as_str), Some("first"));
    assert_eq!(
        region.get(&1).and_then(|w| w.into_inner()).as_deref(),
        Some("first")
    );
}

#[test]
fn manager_listeners_see_every_region() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let manager: ConcurrentMapCacheManager<u64, String> = ConcurrentMapCacheManager::builder()
        .cache_names(["default", "another"])
        .on_event(move |event: &CacheEvent| {
            sink.lock()
                .unwrap()
                .push((event.event_type(), event.source_name().to_string()));
        })
        .build();

    manager.get_cache("default").unwrap().put(1, "one".to_string());
    manager.get_cache("another").unwrap().evict(&1);
    manager.get_cache("another").unwrap().put(1, "one".to_string());
    manager.get_cache("another").unwrap().evict(&1);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("cache_put", "default".to_string()),
            ("cache_put", "another".to_string()),
            ("cache_evict", "another".to_string()),
        ]
    );
}
