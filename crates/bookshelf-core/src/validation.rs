//! Validation utilities.

use crate::{BookshelfError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `BookshelfError` on failure.
    fn validate_request(&self) -> Result<(), BookshelfError> {
        self.validate().map_err(validation_errors_to_bookshelf_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field
/// name so the resulting message is stable.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `BookshelfError`.
#[must_use]
pub fn validation_errors_to_bookshelf_error(errors: ValidationErrors) -> BookshelfError {
    BookshelfError::InvalidFields(field_errors(&errors))
}

/// Common validation functions.
pub mod rules {
    use std::borrow::Cow;
    use validator::ValidationError;

    /// Lowest rating a book can carry.
    pub const MIN_RATING: f64 = 0.0;

    /// Highest rating a book can carry.
    pub const MAX_RATING: f64 = 5.0;

    /// Validates that a rating lies in the closed interval `[0, 5]`.
    ///
    /// NaN fails: it compares false against both bounds.
    pub fn rating_in_range(rating: f64) -> Result<(), ValidationError> {
        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            return Ok(());
        }
        let mut error = ValidationError::new("rating_out_of_range");
        error.message = Some(Cow::Borrowed("rating must be between 0 and 5"));
        Err(error)
    }

    /// Validates that a string is not empty.
    pub fn not_empty(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::new("not_empty"));
        }
        Ok(())
    }
}
