//! Borrow and return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::borrow::{BorrowDetails, BorrowQuery, BorrowRecord, CreateBorrow},
    repository::paging,
    services::borrows::BorrowCandidates,
};

use super::{PaginatedResponse, RequireLibrarian, RequireMember};

fn page_of(items: Vec<BorrowDetails>, total: i64, query: &BorrowQuery) -> PaginatedResponse<BorrowDetails> {
    let (page, per_page, _) = paging(query.page, query.per_page);
    PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }
}

/// List borrow records (librarian)
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrow records, newest first", body = PaginatedResponse<BorrowDetails>),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<PaginatedResponse<BorrowDetails>>> {
    let (items, total) = state.services.borrows.list(&query).await?;
    Ok(Json(page_of(items, total, &query)))
}

/// Books that can be lent and the people they can be lent to
#[utoipa::path(
    get,
    path = "/borrows/candidates",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrow candidates", body = BorrowCandidates),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn candidates(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
) -> AppResult<Json<BorrowCandidates>> {
    Ok(Json(state.services.borrows.candidates().await?))
}

/// Overdue loans (librarian)
#[utoipa::path(
    get,
    path = "/borrows/overdue",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue borrow records", body = Vec<BorrowDetails>),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn overdue(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    Ok(Json(state.services.borrows.overdue().await?))
}

/// The signed-in member's borrow records
#[utoipa::path(
    get,
    path = "/borrows/mine",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Own borrow records", body = PaginatedResponse<BorrowDetails>),
        (status = 403, description = "Students and faculty only")
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    RequireMember(session): RequireMember,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<PaginatedResponse<BorrowDetails>>> {
    let (page, per_page) = (query.page, query.per_page);
    let (items, total) = state
        .services
        .borrows
        .list_for_profile(session.profile_id(), query)
        .await?;

    let (page, per_page, _) = paging(page, per_page);
    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Lend a book to a student or faculty member
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecord),
        (status = 404, description = "Book or profile not found"),
        (status = 409, description = "No copy available"),
        (status = 422, description = "Borrower not eligible")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let record = state.services.borrows.borrow(&request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Record the return of a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecord),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRecord>> {
    Ok(Json(state.services.borrows.return_borrow(id).await?))
}
