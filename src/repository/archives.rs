//! Project archive metadata

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::archive::ProjectArchive,
};

/// Metadata of a freshly stored archive
#[derive(Debug, Clone)]
pub struct NewArchive<'a> {
    pub academic_year: &'a str,
    pub file_name: &'a str,
    pub file_path: &'a str,
    pub size_bytes: i64,
    pub checksum: &'a str,
    pub uploaded_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct ArchivesRepository {
    pool: Pool<Postgres>,
}

impl ArchivesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ProjectArchive> {
        sqlx::query_as::<_, ProjectArchive>("SELECT * FROM project_archives WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Archive with id {} not found", id)))
    }

    pub async fn get_by_year(&self, academic_year: &str) -> AppResult<Option<ProjectArchive>> {
        let row = sqlx::query_as::<_, ProjectArchive>(
            "SELECT * FROM project_archives WHERE academic_year = $1",
        )
        .bind(academic_year)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Latest academic year first
    pub async fn list(&self) -> AppResult<Vec<ProjectArchive>> {
        let rows = sqlx::query_as::<_, ProjectArchive>(
            "SELECT * FROM project_archives ORDER BY academic_year DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert the archive of a year, replacing the previous row for that year
    pub async fn replace(&self, archive: &NewArchive<'_>) -> AppResult<ProjectArchive> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_archives WHERE academic_year = $1")
            .bind(archive.academic_year)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, ProjectArchive>(
            r#"
            INSERT INTO project_archives
                (id, academic_year, file_name, file_path, size_bytes, checksum, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(archive.academic_year)
        .bind(archive.file_name)
        .bind(archive.file_path)
        .bind(archive.size_bytes)
        .bind(archive.checksum)
        .bind(archive.uploaded_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ProjectArchive> {
        sqlx::query_as::<_, ProjectArchive>(
            "DELETE FROM project_archives WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Archive with id {} not found", id)))
    }
}
