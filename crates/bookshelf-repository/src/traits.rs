//! Repository trait definitions.

use bookshelf_core::{Book, BookshelfResult, NewBook, RequestContext};
use async_trait::async_trait;

/// Book repository contract consumed by the service layer.
///
/// `get_by_id` distinguishes a missing record (`Ok(None)`) from a failure
/// (`Err`).
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persists a new book and returns it with its creation timestamp.
    async fn create(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<Book>;

    /// Finds a book by its identifier.
    async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>>;

    /// Lists all books, most recently created first.
    async fn list(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>>;
}
