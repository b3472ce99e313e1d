//! Book controller.

use crate::{
    extractors::Context,
    responses::{created, AppError, InvalidJson},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookshelf_core::{Book, ErrorResponse, NewBook};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Creates the book router. Methods other than GET and POST get 405.
pub fn router() -> Router<AppState> {
    Router::new().route("/books", get(get_books).post(create_book))
}

/// Query string of `GET /books`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Book to fetch. Omitted or empty lists every book.
    pub id: Option<String>,
}

/// Fetch one book by `id`, or list all books newest first.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (
            status = 200,
            description = "The requested book, or every book when `id` is omitted",
            body = [Book]
        ),
        (status = 404, description = "No book with this id", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
        (status = 503, description = "Request deadline exceeded", body = ErrorResponse)
    )
)]
pub async fn get_books(
    State(state): State<AppState>,
    Context(ctx): Context,
    Query(query): Query<BookQuery>,
) -> Result<Response, AppError> {
    match query.id.filter(|id| !id.is_empty()) {
        Some(id) => {
            debug!("Get book request: {}", id);
            let book = state.book_service.get_book(&ctx, &id).await?;
            Ok(Json(book).into_response())
        }
        None => {
            debug!("List books request");
            let books = state.book_service.list_books(&ctx).await?;
            Ok(Json(books).into_response())
        }
    }
}

/// Create a book.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Malformed body or invalid book", body = ErrorResponse),
        (status = 409, description = "A book with this id already exists", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Context(ctx): Context,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), Response> {
    let Json(book) = payload.map_err(|rejection| InvalidJson(rejection).into_response())?;
    debug!("Create book request: {}", book.id);

    let book = state
        .book_service
        .create_book(&ctx, book)
        .await
        .map_err(|e| AppError(e).into_response())?;

    Ok(created(book))
}
