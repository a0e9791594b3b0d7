//! API handlers for the department library REST endpoints

pub mod archives;
pub mod auth;
pub mod books;
pub mod borrows;
pub mod health;
pub mod navigation;
pub mod openapi;
pub mod periodicals;
pub mod registrations;
pub mod reports;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::session::Session, AppState};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return Ok(None);
    };

    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
}

/// Signed-in session of an active profile
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let session = state.services.identity.current_session(token).await?;
        session.require_active()?;

        Ok(CurrentSession(session))
    }
}

/// Session when a valid bearer token is present, for pages open to visitors
pub struct OptionalSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts).ok().flatten() else {
            return Ok(OptionalSession(None));
        };

        match state.services.identity.current_session(token).await {
            Ok(session) => Ok(OptionalSession(Some(session))),
            Err(AppError::Authentication(_)) => Ok(OptionalSession(None)),
            Err(e) => Err(e),
        }
    }
}

/// Active librarian session
pub struct RequireLibrarian(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RequireLibrarian {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        session.require_librarian()?;
        Ok(RequireLibrarian(session))
    }
}

/// Active student or faculty session
pub struct RequireMember(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RequireMember {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        session.require_member()?;
        Ok(RequireMember(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))).unwrap(), Some("abc"));
        assert_eq!(bearer_token(&parts(None)).unwrap(), None);
        assert!(matches!(
            bearer_token(&parts(Some("Basic abc"))),
            Err(AppError::Authentication(_))
        ));
    }
}
