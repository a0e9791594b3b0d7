//! Project archive endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::archive::ProjectArchive,
};

use super::{CurrentSession, RequireLibrarian};

/// `attachment` disposition for a stored file name
pub(crate) fn attachment(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// List project archives, latest academic year first
#[utoipa::path(
    get,
    path = "/archives",
    tag = "archives",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Archives", body = Vec<ProjectArchive>)
    )
)]
pub async fn list_archives(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
) -> AppResult<Json<Vec<ProjectArchive>>> {
    Ok(Json(state.services.archives.list().await?))
}

/// Upload the archive of an academic year (multipart: `academic_year`, `file`)
#[utoipa::path(
    post,
    path = "/archives",
    tag = "archives",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "academic_year and file fields"),
    responses(
        (status = 201, description = "Archive stored", body = ProjectArchive),
        (status = 400, description = "Invalid year, file name or size"),
        (status = 403, description = "Librarian only")
    )
)]
pub async fn upload_archive(
    State(state): State<crate::AppState>,
    RequireLibrarian(session): RequireLibrarian,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectArchive>)> {
    let mut academic_year = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("academic_year") => {
                academic_year = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File name is missing".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let academic_year =
        academic_year.ok_or_else(|| AppError::BadRequest("academic_year is required".to_string()))?;
    let (file_name, bytes) = file.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    let archive = state
        .services
        .archives
        .upload(&academic_year, &file_name, &bytes, session.profile_id())
        .await?;

    Ok((StatusCode::CREATED, Json(archive)))
}

/// Download an archive file
#[utoipa::path(
    get,
    path = "/archives/{id}/download",
    tag = "archives",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Archive ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Archive not found")
    )
)]
pub async fn download_archive(
    State(state): State<crate::AppState>,
    CurrentSession(_session): CurrentSession,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (archive, bytes) = state.services.archives.download(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&archive.file_name)),
        ],
        bytes,
    ))
}

/// Delete an archive and its file
#[utoipa::path(
    delete,
    path = "/archives/{id}",
    tag = "archives",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Archive ID")),
    responses(
        (status = 204, description = "Archive deleted"),
        (status = 404, description = "Archive not found")
    )
)]
pub async fn delete_archive(
    State(state): State<crate::AppState>,
    RequireLibrarian(_session): RequireLibrarian,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.archives.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_header_escapes_quotes() {
        assert_eq!(
            attachment("projects 2024.zip"),
            "attachment; filename=\"projects 2024.zip\""
        );
        assert_eq!(attachment("a\"b.zip"), "attachment; filename=\"a_b.zip\"");
    }
}
