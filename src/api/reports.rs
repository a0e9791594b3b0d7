//! CSV report downloads (librarian)

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::{error::AppResult, services::reports::ReportKind};

use super::{archives::attachment, RequireLibrarian};

/// Export a report as CSV
#[utoipa::path(
    get,
    path = "/reports/{report}",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("report" = ReportKind, Path, description = "borrow_records, available_books or active_users")),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 403, description = "Librarian only"),
        (status = 404, description = "No records found to export")
    )
)]
pub async fn export_report(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(kind): Path<ReportKind>,
) -> AppResult<impl IntoResponse> {
    let report = state.services.reports.generate(kind).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&report.file_name)),
        ],
        report.content,
    ))
}
