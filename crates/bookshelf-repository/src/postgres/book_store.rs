//! PostgreSQL book store.

use crate::{BookStore, DatabasePool};
use bookshelf_core::{Book, BookshelfError, BookshelfResult, NewBook, RequestContext};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// Book store backed by the `books` table.
#[derive(Clone)]
pub struct PgBookStore {
    pool: Arc<DatabasePool>,
}

impl PgBookStore {
    /// Creates a new PostgreSQL book store.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a book.
#[derive(Debug, FromRow)]
struct BookRow {
    id: String,
    title: String,
    rating: f64,
    created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn insert(&self, ctx: &RequestContext, book: &NewBook) -> BookshelfResult<DateTime<Utc>> {
        debug!("Inserting book: {}", book.id);

        ctx.run("store.insert", async {
            sqlx::query_scalar::<_, DateTime<Utc>>(
                r#"
                INSERT INTO books (id, title, rating)
                VALUES ($1, $2, $3)
                RETURNING created_at
                "#,
            )
            .bind(&book.id)
            .bind(&book.title)
            .bind(book.rating)
            .fetch_one(self.pool.inner())
            .await
            .map_err(BookshelfError::from)
        })
        .await
    }

    async fn fetch_by_id(&self, ctx: &RequestContext, id: &str) -> BookshelfResult<Option<Book>> {
        debug!("Fetching book by id: {}", id);

        ctx.run("store.fetch_by_id", async {
            sqlx::query_as::<_, BookRow>(
                r#"
                SELECT id, title, rating, created_at
                FROM books
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(self.pool.inner())
            .await
            .map(|row| row.map(Book::from))
            .map_err(BookshelfError::from)
        })
        .await
    }

    async fn fetch_all(&self, ctx: &RequestContext) -> BookshelfResult<Vec<Book>> {
        debug!("Fetching all books");

        ctx.run("store.fetch_all", async {
            sqlx::query_as::<_, BookRow>(
                r#"
                SELECT id, title, rating, created_at
                FROM books
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(self.pool.inner())
            .await
            .map(|rows| rows.into_iter().map(Book::from).collect())
            .map_err(BookshelfError::from)
        })
        .await
    }

    async fn ping(&self, ctx: &RequestContext) -> BookshelfResult<()> {
        self.pool.health_check(ctx).await
    }
}
