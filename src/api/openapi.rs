//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    archives, auth, books, borrows, health, navigation, periodicals, registrations, reports, stats,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Department Library API",
        version = "1.0.0",
        description = "Registration, catalog, borrow tracking and project archives for the AI&DS department library",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        // Navigation
        navigation::check,
        navigation::menu,
        // Registrations
        registrations::list_registrations,
        registrations::approve,
        registrations::reject,
        // Books
        books::public_search,
        books::list_books,
        books::categories,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Periodicals
        periodicals::list_magazines,
        periodicals::get_magazine,
        periodicals::create_magazine,
        periodicals::update_magazine,
        periodicals::delete_magazine,
        periodicals::list_journals,
        periodicals::get_journal,
        periodicals::create_journal,
        periodicals::update_journal,
        periodicals::delete_journal,
        // Borrows
        borrows::list_borrows,
        borrows::candidates,
        borrows::overdue,
        borrows::my_borrows,
        borrows::create_borrow,
        borrows::return_borrow,
        // Archives
        archives::list_archives,
        archives::upload_archive,
        archives::download_archive,
        archives::delete_archive,
        // Reports
        reports::export_report,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            auth::SignUpResponse,
            crate::models::profile::SignUpRequest,
            crate::models::profile::LoginRequest,
            crate::models::profile::Profile,
            crate::models::profile::ProfileShort,
            crate::models::profile::Role,
            crate::models::profile::ProfileStatus,
            // Navigation
            navigation::NavigationResponse,
            crate::services::gate::Route,
            crate::services::gate::GateDecision,
            crate::services::gate::MenuItem,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::periodical::Magazine,
            crate::models::periodical::MagazineInput,
            crate::models::periodical::Journal,
            crate::models::periodical::JournalInput,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::BorrowCounts,
            crate::services::borrows::BorrowCandidates,
            // Archives
            crate::models::archive::ProjectArchive,
            // Reports and stats
            crate::services::reports::ReportKind,
            crate::services::stats::DashboardStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and sign-in"),
        (name = "navigation", description = "Page access decisions"),
        (name = "registrations", description = "Registration review"),
        (name = "books", description = "Book catalog"),
        (name = "periodicals", description = "Magazines and journals"),
        (name = "borrows", description = "Borrow and return"),
        (name = "archives", description = "Project archives"),
        (name = "reports", description = "CSV reports"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
