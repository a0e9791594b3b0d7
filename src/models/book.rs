//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub edition: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short book representation embedded in borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub available_copies: i32,
}

/// Book search query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Search in title, author and publisher
    pub q: Option<String>,
    pub category: Option<String>,
    /// Only books with at least one copy on the shelf
    pub available_only: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_copies"))]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    pub edition: Option<String>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
    /// Defaults to total_copies
    pub available_copies: Option<i32>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
}

impl CreateBook {
    pub fn initial_available(&self) -> i32 {
        self.available_copies.unwrap_or(self.total_copies)
    }
}

fn validate_create_copies(book: &CreateBook) -> Result<(), ValidationError> {
    check_copies(book.total_copies, book.initial_available())
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "Publisher cannot be empty"))]
    pub publisher: Option<String>,
    pub edition: Option<String>,
    pub total_copies: Option<i32>,
    pub available_copies: Option<i32>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
}

impl UpdateBook {
    /// Copy counts after applying this update to the stored book
    pub fn resulting_copies(&self, current: &Book) -> (i32, i32) {
        (
            self.total_copies.unwrap_or(current.total_copies),
            self.available_copies.unwrap_or(current.available_copies),
        )
    }
}

/// Copy counts must satisfy 1 <= total and 0 <= available <= total
pub fn check_copies(total: i32, available: i32) -> Result<(), ValidationError> {
    let message = if total < 1 {
        Some("Total copies must be at least 1")
    } else if available < 0 {
        Some("Available copies cannot be negative")
    } else if available > total {
        Some("Available copies cannot exceed total copies")
    } else {
        None
    };

    match message {
        None => Ok(()),
        Some(msg) => {
            let mut err = ValidationError::new("copies");
            err.message = Some(msg.into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_bounds() {
        assert!(check_copies(3, 3).is_ok());
        assert!(check_copies(3, 0).is_ok());
        assert!(check_copies(0, 0).is_err());
        assert!(check_copies(3, 4).is_err());
        assert!(check_copies(3, -1).is_err());
    }

    #[test]
    fn create_defaults_available_to_total() {
        let book = CreateBook {
            title: "Deep Learning".to_string(),
            author: "Goodfellow".to_string(),
            publisher: "MIT Press".to_string(),
            edition: None,
            total_copies: 3,
            available_copies: None,
            category: Some("AI".to_string()),
            cover_url: None,
            isbn: None,
        };
        assert_eq!(book.initial_available(), 3);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn create_rejects_more_available_than_total() {
        let book = CreateBook {
            title: "Deep Learning".to_string(),
            author: "Goodfellow".to_string(),
            publisher: "MIT Press".to_string(),
            edition: None,
            total_copies: 2,
            available_copies: Some(5),
            category: None,
            cover_url: None,
            isbn: None,
        };
        assert!(book.validate().is_err());
    }
}
