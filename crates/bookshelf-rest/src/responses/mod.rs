//! API response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_core::{BookshelfError, ErrorResponse};
use serde::Serialize;
use tracing::{debug, error};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub BookshelfError);

impl From<BookshelfError> for AppError {
    fn from(err: BookshelfError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Rejection for a body that is not a well-formed book.
#[derive(Debug)]
pub struct InvalidJson(pub JsonRejection);

impl IntoResponse for InvalidJson {
    fn into_response(self) -> Response {
        debug!("Rejected request body: {}", self.0.body_text());
        let body = ErrorResponse {
            code: "INVALID_JSON".to_string(),
            message: format!("Invalid JSON: {}", self.0.body_text()),
            details: None,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl From<JsonRejection> for InvalidJson {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
