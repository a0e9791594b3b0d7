//! Magazine and journal endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::periodical::{Journal, JournalInput, Magazine, MagazineInput, PeriodicalQuery},
};

use super::{CurrentSession, RequireLibrarian};

/// List magazines, newest issue first
#[utoipa::path(
    get,
    path = "/magazines",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(PeriodicalQuery),
    responses(
        (status = 200, description = "Magazines", body = Vec<Magazine>)
    )
)]
pub async fn list_magazines(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Query(query): Query<PeriodicalQuery>,
) -> AppResult<Json<Vec<Magazine>>> {
    Ok(Json(state.services.catalog.list_magazines(&query).await?))
}

#[utoipa::path(
    get,
    path = "/magazines/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Magazine ID")),
    responses(
        (status = 200, description = "Magazine", body = Magazine),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn get_magazine(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Magazine>> {
    Ok(Json(state.services.catalog.get_magazine(id).await?))
}

#[utoipa::path(
    post,
    path = "/magazines",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    request_body = MagazineInput,
    responses(
        (status = 201, description = "Magazine created", body = Magazine),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn create_magazine(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Json(input): Json<MagazineInput>,
) -> AppResult<(StatusCode, Json<Magazine>)> {
    let created = state.services.catalog.create_magazine(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/magazines/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Magazine ID")),
    request_body = MagazineInput,
    responses(
        (status = 200, description = "Magazine updated", body = Magazine),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn update_magazine(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
    Json(input): Json<MagazineInput>,
) -> AppResult<Json<Magazine>> {
    Ok(Json(state.services.catalog.update_magazine(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/magazines/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Magazine ID")),
    responses(
        (status = 204, description = "Magazine deleted"),
        (status = 404, description = "Magazine not found")
    )
)]
pub async fn delete_magazine(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_magazine(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List journals, newest publication first
#[utoipa::path(
    get,
    path = "/journals",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(PeriodicalQuery),
    responses(
        (status = 200, description = "Journals", body = Vec<Journal>)
    )
)]
pub async fn list_journals(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Query(query): Query<PeriodicalQuery>,
) -> AppResult<Json<Vec<Journal>>> {
    Ok(Json(state.services.catalog.list_journals(&query).await?))
}

#[utoipa::path(
    get,
    path = "/journals/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Journal ID")),
    responses(
        (status = 200, description = "Journal", body = Journal),
        (status = 404, description = "Journal not found")
    )
)]
pub async fn get_journal(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Journal>> {
    Ok(Json(state.services.catalog.get_journal(id).await?))
}

#[utoipa::path(
    post,
    path = "/journals",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    request_body = JournalInput,
    responses(
        (status = 201, description = "Journal created", body = Journal),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn create_journal(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Json(input): Json<JournalInput>,
) -> AppResult<(StatusCode, Json<Journal>)> {
    let created = state.services.catalog.create_journal(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/journals/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Journal ID")),
    request_body = JournalInput,
    responses(
        (status = 200, description = "Journal updated", body = Journal),
        (status = 404, description = "Journal not found")
    )
)]
pub async fn update_journal(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
    Json(input): Json<JournalInput>,
) -> AppResult<Json<Journal>> {
    Ok(Json(state.services.catalog.update_journal(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/journals/{id}",
    tag = "periodicals",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Journal ID")),
    responses(
        (status = 204, description = "Journal deleted"),
        (status = 404, description = "Journal not found")
    )
)]
pub async fn delete_journal(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_journal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
