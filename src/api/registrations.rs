//! Registration review endpoints (librarian)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::profile::{Profile, RegistrationQuery},
};

use super::RequireLibrarian;

/// List student and faculty registrations
#[utoipa::path(
    get,
    path = "/registrations",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Registrations, newest first", body = Vec<Profile>),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn list_registrations(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Query(query): Query<RegistrationQuery>,
) -> AppResult<Json<Vec<Profile>>> {
    let profiles = state.services.registrations.list(&query).await?;
    Ok(Json(profiles))
}

/// Approve a pending registration
#[utoipa::path(
    post,
    path = "/registrations/{id}/approve",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Registration approved", body = Profile),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Registration already decided")
    )
)]
pub async fn approve(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.registrations.approve(id).await?;
    Ok(Json(profile))
}

/// Reject a pending registration
#[utoipa::path(
    post,
    path = "/registrations/{id}/reject",
    tag = "registrations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Registration rejected", body = Profile),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Registration already decided")
    )
)]
pub async fn reject(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.registrations.reject(id).await?;
    Ok(Json(profile))
}
