//! Property tests for write-through and eviction.
//!
//! Invariants tested:
//! - The region always holds the last value written for a key
//! - Evicting a key removes only that key
//! - Evicting all entries empties the region

use bookshelf::{Book, BookshelfContext};
use proptest::prelude::*;
use shelfcache::ValueWrapper;
use std::collections::HashMap;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
enum Op {
    Find(u64),
    Update(u64, String),
    Remove(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..16).prop_map(Op::Find),
        (0u64..16, "[a-z]{1,8}").prop_map(|(id, title)| Op::Update(id, title)),
        (0u64..16).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn region_mirrors_a_model(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let context = BookshelfContext::with_defaults();
            let repository = context.repository();
            let region = context.default_cache().unwrap();
            let mut model: HashMap<u64, Book> = HashMap::new();

            for op in ops {
                match op {
                    Op::Find(id) => {
                        let book = repository.find_book(id).await.unwrap();
                        if let Some(expected) = model.get(&id) {
                            prop_assert_eq!(&book, expected);
                        }
                        model.insert(id, book);
                    }
                    Op::Update(id, title) => {
                        let book = Book::new(id, title);
                        repository.update_book(id, book.clone()).await.unwrap();
                        model.insert(id, book);
                    }
                    Op::Remove(id) => {
                        repository.remove_book(id).await.unwrap();
                        model.remove(&id);
                    }
                }
            }

            prop_assert_eq!(region.len(), model.len());
            for (id, book) in &model {
                let cached = region.get(id).and_then(ValueWrapper::into_inner);
                prop_assert_eq!(cached.as_ref(), Some(book));
            }

            repository.remove_all().await.unwrap();
            prop_assert!(region.is_empty());
            Ok(())
        })?;
    }
}
