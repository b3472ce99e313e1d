//! Durable store contract.

use bookshelf_core::{Book, BookshelfResult, NewBook, RequestContext};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Operations against the relational system of record.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Inserts a record and returns the creation timestamp assigned by the
    /// store.
    ///
    /// A rating outside `[0, 5]` is rejected by the store itself.
    async fn insert(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<DateTime<Utc>>;

    /// Fetches a record by id. A missing record is `Ok(None)`, not an error.
    async fn fetch_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>>;

    /// Fetches every record ordered by creation timestamp, newest first.
    async fn fetch_all(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>>;

    /// Verifies connectivity without side effects.
    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()>;
}
