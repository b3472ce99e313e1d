//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Bookshelf.
///
/// Variants are grouped by the layer that raises them. Only the store-side
/// and validation variants ever reach a caller of the book operations; cache
/// errors are recovered inside the repository.
#[derive(Error, Debug)]
pub enum BookshelfError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error raised outside request validation, e.g. a store
    /// CHECK constraint.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request validation failed on one or more fields.
    #[error("Validation error: {}", join_messages(.0))]
    InvalidFields(Vec<FieldError>),

    /// Conflict error (e.g., duplicate identifier)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Durable store error
    #[error("Database error: {0}")]
    Database(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Deadline / Lifecycle Errors ============
    /// The request deadline expired before the operation finished.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The operation was abandoned because its request was cancelled.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Graceful drain did not finish inside the grace period.
    #[error("Shutdown timed out after {0:?} with requests still in flight")]
    ShutdownTimeout(std::time::Duration),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BookshelfError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::InvalidFields(_) => 400,
            Self::Conflict(_) => 409,
            Self::Timeout(_) | Self::Cancelled(_) => 503,
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::ShutdownTimeout(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) | Self::InvalidFields(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::ShutdownTimeout(_) => "SHUTDOWN_TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }
}

fn join_messages(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for BookshelfError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                match db_err.code().as_deref() {
                    // PostgreSQL unique_violation
                    Some("23505") => Self::Conflict(db_err.message().to_string()),
                    // PostgreSQL check_violation
                    Some("23514") => Self::Validation(db_err.message().to_string()),
                    _ => Self::Database(err.to_string()),
                }
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `BookshelfError`. Field errors
    /// are carried into `details`.
    #[must_use]
    pub fn from_error(error: &BookshelfError) -> Self {
        let response = Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        };
        match error {
            BookshelfError::InvalidFields(fields) => response.with_details(fields.clone()),
            _ => response,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&BookshelfError> for ErrorResponse {
    fn from(error: &BookshelfError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn title_required() -> FieldError {
        FieldError {
            field: "title".to_string(),
            message: "title is required".to_string(),
            code: "not_empty".to_string(),
        }
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(BookshelfError::not_found("Book", "1").status_code(), 404);
        assert_eq!(BookshelfError::validation("title is required").status_code(), 400);
        assert_eq!(BookshelfError::conflict("duplicate").status_code(), 409);
        assert_eq!(BookshelfError::Database("down".to_string()).status_code(), 500);
        assert_eq!(BookshelfError::Cache("down".to_string()).status_code(), 500);
        assert_eq!(BookshelfError::Timeout("store".to_string()).status_code(), 503);
        assert_eq!(BookshelfError::Cancelled("store".to_string()).status_code(), 503);
        assert_eq!(
            BookshelfError::ShutdownTimeout(Duration::from_secs(30)).status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BookshelfError::not_found("Book", "1").error_code(), "NOT_FOUND");
        assert_eq!(BookshelfError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(BookshelfError::conflict("dup").error_code(), "CONFLICT");
        assert_eq!(BookshelfError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(BookshelfError::Timeout("t".to_string()).error_code(), "TIMEOUT");
        assert_eq!(BookshelfError::Internal("err".to_string()).error_code(), "INTERNAL_ERROR");
        assert_eq!(
            BookshelfError::InvalidFields(vec![title_required()]).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_constructors() {
        let not_found = BookshelfError::not_found("Book", "missing");
        assert!(not_found.to_string().contains("Book"));
        assert!(not_found.to_string().contains("missing"));

        let validation = BookshelfError::validation("rating must be between 0 and 5");
        assert!(validation.to_string().contains("rating"));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = BookshelfError::not_found("Book", "1");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_invalid_fields_message_and_details() {
        let rating = FieldError {
            field: "rating".to_string(),
            message: "rating must be between 0 and 5".to_string(),
            code: "rating_out_of_range".to_string(),
        };
        let err = BookshelfError::InvalidFields(vec![rating.clone(), title_required()]);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Validation error: rating must be between 0 and 5; title is required"
        );

        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.details, Some(vec![rating, title_required()]));
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let err = BookshelfError::validation("title is required");
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json.get("details").is_none());
    }
}
