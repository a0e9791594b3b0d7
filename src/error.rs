//! Error types for the department library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned to clients alongside the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchItem = 5,
    AccountPending = 6,
    ItemNotAvailable = 7,
    Duplicate = 8,
    AccountRejected = 9,
    InvalidTransition = 10,
    BadValue = 11,
    StorageFailure = 12,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Account pending: {0}")]
    AccountPending(String),

    #[error("Account rejected: {0}")]
    AccountRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Not available: {0}")]
    Unavailable(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl AppError {
    /// Error code and HTTP status for this error
    pub fn code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::AccountPending(_) => (StatusCode::FORBIDDEN, ErrorCode::AccountPending),
            AppError::AccountRejected(_) => (StatusCode::FORBIDDEN, ErrorCode::AccountRejected),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageFailure),
            AppError::BusinessRule(_) => (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::Failure),
            AppError::Unavailable(_) => (StatusCode::CONFLICT, ErrorCode::ItemNotAvailable),
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, ErrorCode::InvalidTransition),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                "Storage error".to_string()
            }
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::AccountPending(msg)
            | AppError::AccountRejected(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::BusinessRule(msg)
            | AppError::Unavailable(msg)
            | AppError::InvalidTransition(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_forbidden_with_distinct_codes() {
        let (status, code) = AppError::AccountPending("wait".into()).code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, ErrorCode::AccountPending);

        let (status, code) = AppError::AccountRejected("no".into()).code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, ErrorCode::AccountRejected);
    }

    #[test]
    fn unavailable_book_maps_to_item_not_available() {
        let (status, code) = AppError::Unavailable("Book is not available".into()).code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, ErrorCode::ItemNotAvailable);
    }

    #[test]
    fn error_codes_keep_their_numbers() {
        assert_eq!(ErrorCode::Failure as u32, 1);
        assert_eq!(ErrorCode::NotAuthorized as u32, 2);
        assert_eq!(ErrorCode::NoSuchItem as u32, 5);
        assert_eq!(ErrorCode::StorageFailure as u32, 12);

        let (status, code) = AppError::NotFound("missing".into()).code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, ErrorCode::NoSuchItem);
    }

    #[test]
    fn database_errors_hide_details() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
