use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// A book as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Book {
    /// Assigned by the store on creation.
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "The Catcher in the Rye")]
    pub title: String,
    #[schema(example = "J.D. Salinger")]
    pub author: String,
    #[schema(example = 1951)]
    pub published_year: i64,
}

/// The full set of fields a client sends to create or replace a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct BookPayload {
    /// Must not be empty.
    #[schema(example = "The Catcher in the Rye")]
    pub title: String,
    #[schema(example = "J.D. Salinger")]
    pub author: String,
    #[schema(example = 1951)]
    pub published_year: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
}

impl BookValidationError {
    /// The payload field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            BookValidationError::EmptyTitle => "title",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BookValidationError::EmptyTitle => "empty",
        }
    }
}

impl BookPayload {
    /// Checks the field rules, stopping at the first violation.
    ///
    /// `published_year` is an `i64`, so a non-integer year never gets this far:
    /// it is rejected while the body is deserialized.
    pub fn check(&self) -> Result<(), BookValidationError> {
        if self.title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }

        Ok(())
    }
}

impl From<BookValidationError> for ValidationErrors {
    fn from(err: BookValidationError) -> Self {
        let mut error = validator::ValidationError::new(err.code());
        error.message = Some(Cow::Owned(err.to_string()));

        let mut errors = ValidationErrors::new();
        errors.add(err.field(), error);

        errors
    }
}

impl Validate for BookPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.check().map_err(ValidationErrors::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> BookPayload {
        BookPayload {
            title: title.to_string(),
            author: String::from("Test Author"),
            published_year: 2023,
        }
    }

    #[test]
    fn accepts_a_complete_payload() {
        assert_eq!(payload("Test Book").check(), Ok(()));
    }

    #[test]
    fn rejects_an_empty_title() {
        let err = payload("").check().unwrap_err();

        assert_eq!(err, BookValidationError::EmptyTitle);
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn accepts_an_empty_author() {
        let mut book = payload("Anonymous Work");
        book.author.clear();

        assert_eq!(book.check(), Ok(()));
    }

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let errors = payload("").validate().unwrap_err();
        let json = serde_json::to_value(&errors).expect("Errors are serializable");

        assert_eq!(json["title"][0]["code"], "empty");
        assert_eq!(json["title"][0]["message"], "Title must not be empty");
    }

    #[test]
    fn non_integer_year_is_rejected_by_deserialization() {
        let err = serde_json::from_str::<BookPayload>(
            r#"{"title":"Test Book","author":"Test Author","published_year":"2023"}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("expected i64"));

        assert!(serde_json::from_str::<BookPayload>(
            r#"{"title":"Test Book","author":"Test Author","published_year":2023.5}"#,
        )
        .is_err());
    }
}
