//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::paging,
};

use super::{CurrentSession, PaginatedResponse, RequireLibrarian};

async fn search(state: &crate::AppState, query: &BookQuery) -> AppResult<PaginatedResponse<Book>> {
    let (books, total) = state.services.catalog.search_books(query).await?;
    let (page, per_page, _) = paging(query.page, query.per_page);

    Ok(PaginatedResponse {
        items: books,
        total,
        page,
        per_page,
    })
}

/// Public book search, no sign-in needed
#[utoipa::path(
    get,
    path = "/public/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = PaginatedResponse<Book>)
    )
)]
pub async fn public_search(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    Ok(Json(search(&state, &query).await?))
}

/// List books with search and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = PaginatedResponse<Book>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    Ok(Json(search(&state, &query).await?))
}

/// Distinct book categories
#[utoipa::path(
    get,
    path = "/books/categories",
    tag = "books",
    responses(
        (status = 200, description = "Categories", body = Vec<String>)
    )
)]
pub async fn categories(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.services.catalog.categories().await?))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.services.catalog.get_book(id).await?))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid copy counts"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.services.catalog.update_book(id, book).await?))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Copies still on loan")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
