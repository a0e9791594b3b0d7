//! Authentication endpoints: sign-up, login, logout and current profile

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::profile::{LoginRequest, Profile, SignUpRequest},
};

use super::CurrentSession;

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub profile: Profile,
}

#[derive(Serialize, ToSchema)]
pub struct SignUpResponse {
    pub message: String,
    pub profile: Profile,
}

/// Register a student or faculty account, pending librarian approval
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Registration submitted", body = SignUpResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Identifier already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    let profile = state.services.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "Registration submitted. Please wait for the librarian to approve your account."
                .to_string(),
            profile,
        }),
    ))
}

/// Sign in with identifier, password and role
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 403, description = "Wrong role, pending or rejected account", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, session) = state.services.auth.login(request).await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at,
        profile: session.profile,
    }))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<StatusCode> {
    state.services.auth.logout(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed-in profile", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<Profile>> {
    let profile = state.services.auth.me(&session).await?;
    Ok(Json(profile))
}
