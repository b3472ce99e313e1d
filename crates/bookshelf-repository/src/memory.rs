//! In-process implementations of the store, cache and repository seams.
//!
//! Each type can be switched into a failing mode and counts the calls it
//! receives, so tests can assert which layer was touched. Every operation
//! still honors the caller's [`RequestContext`].

use crate::cache::{CacheClient, DEFAULT_TTL};
use crate::{BookRepository, BookStore};
use bookshelf_core::rules::rating_in_range;
use bookshelf_core::{
    Book, BookshelfError, BookshelfResult, NewBook, RequestContext, ValidateExt,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Default)]
struct StoreState {
    books: HashMap<String, Book>,
    last_created_at: Option<DateTime<Utc>>,
}

impl StoreState {
    /// Wall-clock time, bumped by a microsecond when it would not advance.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// Book store held in a map.
///
/// Mirrors the `books` table: duplicate ids are a conflict and an
/// out-of-range rating is rejected even when validation was skipped.
#[derive(Default)]
pub struct InMemoryBookStore {
    state: Mutex<StoreState>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
    insert_calls: AtomicUsize,
    fetch_by_id_calls: AtomicUsize,
    fetch_all_calls: AtomicUsize,
    ping_calls: AtomicUsize,
}

impl InMemoryBookStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail with [`BookshelfError::Database`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every later call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_by_id_calls(&self) -> usize {
        self.fetch_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.state.lock().await.books.len()
    }

    /// Checks whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn simulate_io(&self) -> BookshelfResult<()> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(BookshelfError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    async fn insert_record(&self, book: &NewBook) -> BookshelfResult<DateTime<Utc>> {
        self.simulate_io().await?;
        if rating_in_range(book.rating).is_err() {
            return Err(BookshelfError::validation(
                "new row for relation \"books\" violates check constraint \"books_rating_check\"",
            ));
        }

        let mut state = self.state.lock().await;
        if state.books.contains_key(&book.id) {
            return Err(BookshelfError::conflict(format!(
                "book with id '{}' already exists",
                book.id
            )));
        }
        let created_at = state.next_timestamp();
        state
            .books
            .insert(book.id.clone(), book.clone().into_book(created_at));
        Ok(created_at)
    }

    async fn find_record(&self, id: &str) -> BookshelfResult<Option<Book>> {
        self.simulate_io().await?;
        Ok(self.state.lock().await.books.get(id).cloned())
    }

    async fn all_records(&self) -> BookshelfResult<Vec<Book>> {
        self.simulate_io().await?;
        let mut books: Vec<Book> = self.state.lock().await.books.values().cloned().collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books)
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<DateTime<Utc>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("store.insert", self.insert_record(book)).await
    }

    async fn fetch_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>> {
        self.fetch_by_id_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("store.fetch_by_id", self.find_record(id)).await
    }

    async fn fetch_all(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("store.fetch_all", self.all_records()).await
    }

    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("store.ping", self.simulate_io()).await
    }
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Key/value cache held in a map, with per-key expiry.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    failing: AtomicBool,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    ping_calls: AtomicUsize,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail with [`BookshelfError::Cache`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn ping_calls(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    /// Reads a live entry without counting the call or honoring the
    /// failure switch.
    pub async fn peek(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Writes an entry directly with the default TTL.
    pub async fn put_raw(&self, key: &str, value: &str) {
        self.write(key, value, DEFAULT_TTL).await;
    }

    async fn write(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.lock().await.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn check_available(&self) -> BookshelfResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BookshelfError::Cache("cache unavailable".to_string()));
        }
        Ok(())
    }

    async fn read(&self, key: &str) -> BookshelfResult<Option<String>> {
        self.check_available()?;
        Ok(self.peek(key).await)
    }

    async fn save(&self, key: &str, value: &str, ttl: Duration) -> BookshelfResult<()> {
        self.check_available()?;
        self.write(key, value, ttl).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> BookshelfResult<bool> {
        self.check_available()?;
        Ok(self.entries.lock().await.remove(key).is_some())
    }

    async fn probe(&self) -> BookshelfResult<()> {
        self.check_available()
    }
}

#[async_trait]
impl CacheClient for InMemoryCache {
    async fn get_raw(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<Option<String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("cache.get", self.read(key)).await
    }

    async fn set_raw(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> BookshelfResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("cache.set", self.save(key, value, ttl)).await
    }

    async fn delete(&self, ctx: &RequestContext, key: &str) -> BookshelfResult<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("cache.delete", self.remove(key)).await
    }

    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        ctx.run("cache.ping", self.probe()).await
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Repository without a cache in front of its store.
///
/// Validates like the production repository and records how often each
/// operation was invoked.
#[derive(Default)]
pub struct InMemoryBookRepository {
    store: InMemoryBookStore,
    create_calls: AtomicUsize,
    get_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryBookRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &InMemoryBookStore {
        &self.store
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all operations.
    pub fn total_calls(&self) -> usize {
        self.create_calls() + self.get_calls() + self.list_calls()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<Book> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        book.validate_request()?;
        let created_at = self.store.insert(ctx, book).await?;
        Ok(book.clone().into_book(created_at))
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.store.fetch_by_id(ctx, id).await
    }

    async fn list(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.store.fetch_all(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_orders_newest_first() {
        let store = InMemoryBookStore::new();
        let ctx = RequestContext::background();
        for id in ["a", "b", "c"] {
            store.insert(&ctx, &NewBook::new(id, "Title", 1.0)).await.unwrap();
        }

        let books = store.fetch_all(&ctx).await.unwrap();
        let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert!(books[0].created_at > books[1].created_at);
    }

    #[tokio::test]
    async fn test_store_rejects_out_of_range_rating() {
        let store = InMemoryBookStore::new();
        let ctx = RequestContext::background();

        let err = store
            .insert(&ctx, &NewBook::new("1", "Title", 7.0))
            .await
            .unwrap_err();
        assert!(matches!(err, BookshelfError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_missing_is_none() {
        let store = InMemoryBookStore::new();
        let ctx = RequestContext::background();
        assert_eq!(store.fetch_by_id(&ctx, "nope").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_entries_expire() {
        let cache = InMemoryCache::new();
        let ctx = RequestContext::background();
        cache
            .set_raw(&ctx, "book:1", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(cache.get_raw(&ctx, "book:1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get_raw(&ctx, "book:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_cache_reports_cache_error() {
        let cache = InMemoryCache::new();
        let ctx = RequestContext::background();
        cache.set_failing(true);

        assert!(matches!(
            cache.ping(&ctx).await,
            Err(BookshelfError::Cache(_))
        ));
        assert_eq!(cache.ping_calls(), 1);
    }

    #[tokio::test]
    async fn test_repository_counts_calls() {
        let repo = InMemoryBookRepository::new();
        let ctx = RequestContext::background();

        repo.create(&ctx, &NewBook::new("1", "Clean Code", 4.8))
            .await
            .unwrap();
        repo.get_by_id(&ctx, "1").await.unwrap();
        repo.list(&ctx).await.unwrap();

        assert_eq!(repo.create_calls(), 1);
        assert_eq!(repo.get_calls(), 1);
        assert_eq!(repo.list_calls(), 1);
        assert_eq!(repo.store().len().await, 1);
    }
}
