//! Book service implementation.

use crate::book_service::BookService;
use bookshelf_core::{Book, BookshelfError, BookshelfResult, NewBook, RequestContext, ValidateExt};
use bookshelf_repository::BookRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Validation gate in front of a [`BookRepository`].
///
/// Reads pass straight through. Caching decisions stay in the repository.
pub struct BookServiceImpl<R: BookRepository + ?Sized = dyn BookRepository> {
    repository: Arc<R>,
}

impl<R: BookRepository + ?Sized> BookServiceImpl<R> {
    /// Creates a new book service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: BookRepository + ?Sized + 'static> BookService for BookServiceImpl<R> {
    async fn create_book(&self, ctx: &RequestContext, book: NewBook) -> BookshelfResult<Book> {
        debug!("Creating book: {}", book.id);

        book.validate_request()?;

        let created = self.repository.create(ctx, &book).await?;

        info!("Book created: {}", created.id);
        Ok(created)
    }

    async fn get_book(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Book> {
        debug!("Getting book: {}", id);

        self.repository
            .get_by_id(ctx, id)
            .await?
            .ok_or_else(|| BookshelfError::not_found("Book", id))
    }

    async fn list_books(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>> {
        debug!("Listing books");
        self.repository.list(ctx).await
    }
}
