//! Book entity.

use crate::validation::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// A persisted book record.
///
/// `created_at` is assigned by the durable store at insert time and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Book {
    /// Caller-supplied identifier, also the cache key suffix.
    pub id: String,
    /// Book title.
    pub title: String,
    /// Rating in `[0, 5]`.
    pub rating: f64,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Returns the creation request this record was built from.
    #[must_use]
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            id: self.id.clone(),
            title: self.title.clone(),
            rating: self.rating,
        }
    }
}

/// A book as submitted by a caller, before the store has assigned its
/// creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewBook {
    /// Caller-supplied identifier.
    pub id: String,
    /// Book title, must not be empty.
    pub title: String,
    /// Rating in `[0, 5]`.
    pub rating: f64,
}

impl NewBook {
    /// Creates a new book request.
    pub fn new(id: impl Into<String>, title: impl Into<String>, rating: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            rating,
        }
    }

    /// Attaches the store-assigned timestamp.
    #[must_use]
    pub fn into_book(self, created_at: DateTime<Utc>) -> Book {
        Book {
            id: self.id,
            title: self.title,
            rating: self.rating,
            created_at,
        }
    }
}

impl Validate for NewBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(mut error) = rules::not_empty(&self.id) {
            error.message = Some("id is required".into());
            errors.add("id", error);
        }
        if let Err(mut error) = rules::not_empty(&self.title) {
            error.message = Some("title is required".into());
            errors.add("title", error);
        }
        if let Err(error) = rules::rating_in_range(self.rating) {
            errors.add("rating", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BookshelfError, ValidateExt};

    const BOOK_JSON: &str = concat!(
        r#"{"id":"1","title":"Clean Code","rating":4.8,"#,
        r#""created_at":"2024-01-01T00:00:00Z"}"#
    );

    #[test]
    fn test_valid_book_passes() {
        let book = NewBook::new("1", "Clean Code", 4.8);
        assert!(book.validate_request().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let book = NewBook::new("2", "", 3.0);
        match book.validate_request() {
            Err(BookshelfError::InvalidFields(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "title");
                assert_eq!(fields[0].message, "title is required");
                assert_eq!(fields[0].code, "not_empty");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let book = NewBook::new("3", "Refactoring", 5.5);
        match book.validate_request() {
            Err(BookshelfError::InvalidFields(fields)) => {
                assert_eq!(fields[0].field, "rating");
                assert_eq!(fields[0].message, "rating must be between 0 and 5");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_violations_are_joined() {
        let err = NewBook::new("", "", -1.0).validate_request().unwrap_err();
        let BookshelfError::InvalidFields(fields) = &err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["id", "rating", "title"]);
        assert_eq!(
            err.to_string(),
            "Validation error: id is required; rating must be between 0 and 5; title is required"
        );
    }

    #[test]
    fn test_into_book_keeps_fields() {
        let created_at = Utc::now();
        let book = NewBook::new("1", "Clean Code", 4.8).into_book(created_at);
        assert_eq!(book.id, "1");
        assert_eq!(book.title, "Clean Code");
        assert_eq!(book.created_at, created_at);
        assert_eq!(book.to_new_book(), NewBook::new("1", "Clean Code", 4.8));
    }

    #[test]
    fn test_book_json_shape() {
        let book: Book = serde_json::from_str(BOOK_JSON).unwrap();
        assert_eq!(book.rating, 4.8);

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_new_book_ignores_created_at() {
        let book: NewBook = serde_json::from_str(BOOK_JSON).unwrap();
        assert_eq!(book, NewBook::new("1", "Clean Code", 4.8));
    }
}
