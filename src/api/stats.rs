//! Dashboard statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::DashboardStats};

use super::CurrentSession;

/// Dashboard figures for the signed-in profile
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.services.stats.dashboard(&session).await?))
}
