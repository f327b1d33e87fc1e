//! The cached book repository.
//!
//! Each repository method is a tower service over the [`BookStore`], wrapped
//! in the shelfcache layer describing its cache behaviour:
//!
//! | method | layer | regions |
//! |---|---|---|
//! | [`find_book`](BookRepository::find_book) | cacheable | default region |
//! | [`find_book_in`](BookRepository::find_book_in) | cacheable | chosen per call |
//! | [`update_book`](BookRepository::update_book) | put | default region |
//! | [`remove_book`](BookRepository::remove_book) | evict (key) | default region |
//! | [`remove_all`](BookRepository::remove_all) | evict (all entries) | default region |

use crate::book::Book;
use crate::error::{BookError, RepositoryError};
use crate::store::BookStore;
use shelfcache::{CacheOperationBuilder, RuntimeCacheResolver, SharedCacheManager};
use std::sync::Arc;
use tower::util::BoxCloneSyncService;
use tower::{service_fn, Layer, ServiceExt};

/// Lookup of a book in a caller-chosen region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindBookIn {
    pub id: u64,
    pub cache_name: String,
}

/// Replacement of the book stored under `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBook {
    pub id: u64,
    pub book: Book,
}

type RepositoryService<Req, Resp> = BoxCloneSyncService<Req, Resp, RepositoryError>;

/// Book repository whose reads, writes and removals go through the cache.
#[derive(Clone)]
pub struct BookRepository {
    find: RepositoryService<u64, Book>,
    find_in: RepositoryService<FindBookIn, Book>,
    update: RepositoryService<UpdateBook, Book>,
    remove: RepositoryService<u64, bool>,
    remove_all: RepositoryService<(), ()>,
}

impl BookRepository {
    /// Wires the repository over `store`, caching in `manager`'s regions.
    /// Fixed operations use `default_cache`.
    pub fn new(
        store: BookStore,
        manager: SharedCacheManager<u64, Book>,
        default_cache: &str,
    ) -> Self {
        let find = CacheOperationBuilder::new()
            .name("find_book")
            .cache_manager(Arc::clone(&manager))
            .cache_names([default_cache])
            .key_extractor(|id: &u64| *id)
            .cacheable()
            .layer(service_fn({
                let store = store.clone();
                move |id: u64| {
                    let store = store.clone();
                    async move { Ok::<_, BookError>(store.find(id).await) }
                }
            }));

        let find_in = CacheOperationBuilder::new()
            .name("find_book_in")
            .resolver(RuntimeCacheResolver::new(
                Arc::clone(&manager),
                |req: &FindBookIn| vec![req.cache_name.clone()],
            ))
            .key_extractor(|req: &FindBookIn| req.id)
            .cacheable()
            .layer(service_fn({
                let store = store.clone();
                move |req: FindBookIn| {
                    let store = store.clone();
                    async move { Ok::<_, BookError>(store.find(req.id).await) }
                }
            }));

        let update = CacheOperationBuilder::new()
            .name("update_book")
            .cache_manager(Arc::clone(&manager))
            .cache_names([default_cache])
            .key_extractor(|req: &UpdateBook| req.id)
            .put()
            .layer(service_fn({
                let store = store.clone();
                move |req: UpdateBook| {
                    let store = store.clone();
                    async move { store.update(req.id, req.book) }
                }
            }));

        let remove = CacheOperationBuilder::<u64, u64, Book>::new()
            .name("remove_book")
            .cache_manager(Arc::clone(&manager))
            .cache_names([default_cache])
            .key_extractor(|id: &u64| *id)
            .evict()
            .layer(service_fn({
                let store = store.clone();
                move |id: u64| {
                    let store = store.clone();
                    async move { Ok::<_, BookError>(store.remove(id)) }
                }
            }));

        let remove_all = CacheOperationBuilder::<(), u64, Book>::new()
            .name("remove_all")
            .cache_manager(manager)
            .cache_names([default_cache])
            .all_entries(true)
            .evict()
            .layer(service_fn(move |_: ()| {
                let store = store.clone();
                async move {
                    store.remove_all();
                    Ok::<_, BookError>(())
                }
            }));

        Self {
            find: BoxCloneSyncService::new(find),
            find_in: BoxCloneSyncService::new(find_in),
            update: BoxCloneSyncService::new(update),
            remove: BoxCloneSyncService::new(remove),
            remove_all: BoxCloneSyncService::new(remove_all),
        }
    }

    /// Reads through the default region.
    pub async fn find_book(&self, id: u64) -> Result<Book, RepositoryError> {
        self.find.clone().oneshot(id).await
    }

    /// Reads through the region named `cache_name`.
    pub async fn find_book_in(
        &self,
        id: u64,
        cache_name: impl Into<String>,
    ) -> Result<Book, RepositoryError> {
        let req = FindBookIn {
            id,
            cache_name: cache_name.into(),
        };
        self.find_in.clone().oneshot(req).await
    }

    /// Stores `book` and writes it through to the default region.
    pub async fn update_book(&self, id: u64, book: Book) -> Result<Book, RepositoryError> {
        self.update.clone().oneshot(UpdateBook { id, book }).await
    }

    /// Removes the book and evicts it from the default region. Returns
    /// whether the store held the book.
    pub async fn remove_book(&self, id: u64) -> Result<bool, RepositoryError> {
        self.remove.clone().oneshot(id).await
    }

    /// Removes every book and clears the default region.
    pub async fn remove_all(&self) -> Result<(), RepositoryError> {
        self.remove_all.clone().oneshot(()).await
    }
}

impl std::fmt::Debug for BookRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookRepository").finish_non_exhaustive()
    }
}
