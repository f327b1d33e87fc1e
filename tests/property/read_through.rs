//! Property tests for read-through caching.
//!
//! Invariants tested:
//! - An id never queried is a miss in every region
//! - An id queried once is a hit with the value first returned
//! - The backing store is consulted once per distinct id and region

use bookshelf::BookshelfContext;
use proptest::prelude::*;
use std::collections::HashSet;
use tokio::runtime::Runtime;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn first_lookup_misses_second_hits(ids in prop::collection::vec(0u64..64, 1..40)) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let context = BookshelfContext::with_defaults();
            let repository = context.repository();
            let region = context.default_cache().unwrap();
            let mut seen = HashSet::new();

            for id in &ids {
                if seen.insert(*id) {
                    prop_assert!(region.get(id).is_none());
                }
                let first = repository.find_book(*id).await.unwrap();
                let second = repository.find_book(*id).await.unwrap();
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(region.get(id).and_then(|w| w.into_inner()), Some(first));
            }

            prop_assert_eq!(context.book_store().lookups(), seen.len());
            prop_assert_eq!(region.len(), seen.len());
            Ok(())
        })?;
    }

    #[test]
    fn lookups_populate_only_the_chosen_region(
        calls in prop::collection::vec((0u64..32, prop::bool::ANY), 1..40)
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let context = BookshelfContext::with_defaults();
            let repository = context.repository();
            let manager = context.cache_manager();
            let default = manager.get_cache("default").unwrap();
            let another = manager.get_cache("another").unwrap();
            let mut in_default = HashSet::new();
            let mut in_another = HashSet::new();

            for (id, use_another) in &calls {
                let (name, keys) = if *use_another {
                    ("another", &mut in_another)
                } else {
                    ("default", &mut in_default)
                };
                repository.find_book_in(*id, name).await.unwrap();
                keys.insert(*id);
            }

            for id in 0u64..32 {
                prop_assert_eq!(default.get(&id).is_some(), in_default.contains(&id));
                prop_assert_eq!(another.get(&id).is_some(), in_another.contains(&id));
            }
            Ok(())
        })?;
    }
}
