//! Book service trait definition.

use bookshelf_core::{Book, BookshelfResult, NewBook, RequestContext};
use async_trait::async_trait;

/// Book service trait.
#[async_trait]
pub trait BookService: Send + Sync {
    /// Validates and persists a new book.
    async fn create_book(&self, ctx: &RequestContext, book: NewBook) -> BookshelfResult<Book>;

    /// Gets a book by ID. A missing book is [`bookshelf_core::BookshelfError::NotFound`].
    async fn get_book(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Book>;

    /// Lists all books, newest first.
    async fn list_books(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>>;
}
