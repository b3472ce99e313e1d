//! Cache-aside book repository.

use crate::cache::{cache_keys, CacheClient, CacheExt};
use crate::{BookRepository, BookStore};
use bookshelf_core::{Book, BookshelfResult, NewBook, RequestContext, ValidateExt};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Book repository that fronts the durable store with the volatile cache.
///
/// Writes go to the store first and only then touch the cache: the new record
/// is cached under `book:<id>` and `books:all` is deleted. Reads try the cache
/// and fall back to the store, repopulating the cache on a store hit. A cache
/// failure never fails the operation. A store failure always does.
pub struct CachedBookRepository {
    store: Arc<dyn BookStore>,
    cache: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl CachedBookRepository {
    /// Creates a repository over `store` and `cache` with one TTL for both
    /// single-record and list entries.
    #[must_use]
    pub fn new(store: Arc<dyn BookStore>, cache: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Returns the entry TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn cache_put<T: serde::Serialize + Send + Sync>(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &T,
    ) {
        if let Err(e) = self.cache.set(ctx, key, value, self.ttl).await {
            warn!(key = %key, error = %e, "Failed to populate cache");
        }
    }

    async fn cache_lookup<T: serde::de::DeserializeOwned + Send>(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Option<T> {
        match self.cache.get::<T>(ctx, key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Serving from cache");
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }
}

#[async_trait]
impl BookRepository for CachedBookRepository {
    async fn create(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<Book> {
        book.validate_request()?;

        let created_at = self.store.insert(ctx, book).await?;
        let record = book.clone().into_book(created_at);

        self.cache_put(ctx, &cache_keys::book_by_id(&record.id), &record)
            .await;
        if let Err(e) = self.cache.delete(ctx, cache_keys::BOOK_LIST).await {
            warn!(
                key = cache_keys::BOOK_LIST,
                error = %e,
                "Failed to invalidate list cache"
            );
        }

        info!(book_id = %record.id, "Book created");
        Ok(record)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>> {
        let key = cache_keys::book_by_id(id);
        if let Some(book) = self.cache_lookup::<Book>(ctx, &key).await {
            return Ok(Some(book));
        }

        let Some(book) = self.store.fetch_by_id(ctx, id).await? else {
            debug!(book_id = %id, "Book not found in store");
            return Ok(None);
        };

        self.cache_put(ctx, &key, &book).await;
        Ok(Some(book))
    }

    async fn list(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>> {
        if let Some(books) = self.cache_lookup::<Vec<Book>>(ctx, cache_keys::BOOK_LIST).await {
            return Ok(books);
        }

        let books = self.store.fetch_all(ctx).await?;
        self.cache_put(ctx, cache_keys::BOOK_LIST, &books).await;
        Ok(books)
    }
}
