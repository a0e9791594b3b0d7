//! Magazines and journals: flat bibliographic records managed by the librarian

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Magazine {
    pub id: Uuid,
    pub title: String,
    pub publisher: String,
    pub issue_number: String,
    pub publication_date: NaiveDate,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MagazineInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "Issue number is required"))]
    pub issue_number: String,
    pub publication_date: NaiveDate,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Journal {
    pub id: Uuid,
    pub title: String,
    pub author_editor: String,
    pub journal_name: String,
    pub publisher: String,
    pub publication_date: NaiveDate,
    pub category: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct JournalInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author/editor is required"))]
    pub author_editor: String,
    #[validate(length(min = 1, message = "Journal name is required"))]
    pub journal_name: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    pub publication_date: NaiveDate,
    pub category: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
}

/// Free-text search for magazines and journals
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PeriodicalQuery {
    pub q: Option<String>,
}

/// Empty optional strings from forms are stored as NULL
pub fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_become_null() {
        assert_eq!(blank_to_none(&Some("  ".to_string())), None);
        assert_eq!(blank_to_none(&None), None);
        assert_eq!(blank_to_none(&Some(" AI ".to_string())), Some("AI"));
    }
}
