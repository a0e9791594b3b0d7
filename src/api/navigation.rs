//! Page access decisions for the web client

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    services::gate::{self, GateDecision, MenuItem, Route},
};

use super::OptionalSession;

#[derive(Deserialize, IntoParams)]
pub struct NavigationQuery {
    /// Page path, e.g. /dashboard/books
    pub path: String,
}

#[derive(Serialize, ToSchema)]
pub struct NavigationResponse {
    pub route: Route,
    pub decision: GateDecision,
    /// Page to go to instead, when not rendering
    pub redirect_to: Option<String>,
}

/// Decide whether a page renders for the current visitor
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Gate decision", body = NavigationResponse),
        (status = 404, description = "Unknown page")
    )
)]
pub async fn check(
    OptionalSession(session): OptionalSession,
    Query(query): Query<NavigationQuery>,
) -> AppResult<Json<NavigationResponse>> {
    let route = Route::from_path(&query.path)
        .ok_or_else(|| AppError::NotFound(format!("Unknown page {}", query.path)))?;

    let decision = gate::evaluate(session.as_ref(), route);

    Ok(Json(NavigationResponse {
        route,
        decision,
        redirect_to: decision.redirect_to().map(|r| r.path().to_string()),
    }))
}

/// Navigation menu for the current visitor
#[utoipa::path(
    get,
    path = "/navigation/menu",
    tag = "navigation",
    responses(
        (status = 200, description = "Menu entries", body = Vec<MenuItem>)
    )
)]
pub async fn menu(
    OptionalSession(session): OptionalSession,
) -> Json<Vec<MenuItem>> {
    let role = session
        .filter(|s| s.require_active().is_ok())
        .map(|s| s.role());
    Json(gate::menu(role))
}
