//! Project archives: one uploaded file per academic year

use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::archive::{check_file_name, parse_academic_year, ProjectArchive},
    repository::{archives::NewArchive, Repository},
    services::storage::ObjectStore,
};

#[derive(Clone)]
pub struct ArchivesService {
    repository: Repository,
    store: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
}

impl ArchivesService {
    pub fn new(repository: Repository, store: Arc<dyn ObjectStore>, max_upload_bytes: usize) -> Self {
        Self {
            repository,
            store,
            max_upload_bytes,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<ProjectArchive>> {
        self.repository.archives.list().await
    }

    /// Store the archive of an academic year, replacing any previous file
    pub async fn upload(
        &self,
        academic_year: &str,
        file_name: &str,
        bytes: &[u8],
        uploaded_by: Uuid,
    ) -> AppResult<ProjectArchive> {
        let academic_year = parse_academic_year(academic_year)?;
        let file_name = check_file_name(file_name)?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "File exceeds the {} byte upload limit",
                self.max_upload_bytes
            )));
        }

        if let Some(previous) = self.repository.archives.get_by_year(&academic_year).await? {
            self.store.remove(&[previous.file_path.clone()]).await?;
            tracing::info!(
                academic_year = %academic_year,
                file = %previous.file_name,
                "previous archive removed"
            );
        }

        let file_path = format!("{}/{}", academic_year, file_name);
        self.store.upload(&file_path, bytes).await?;

        let checksum = hex::encode(Sha256::digest(bytes));
        let archive = self
            .repository
            .archives
            .replace(&NewArchive {
                academic_year: &academic_year,
                file_name,
                file_path: &file_path,
                size_bytes: bytes.len() as i64,
                checksum: &checksum,
                uploaded_by: Some(uploaded_by),
            })
            .await?;

        tracing::info!(
            archive_id = %archive.id,
            academic_year = %archive.academic_year,
            size = archive.size_bytes,
            "archive uploaded"
        );
        Ok(archive)
    }

    /// Archive metadata with its bytes
    pub async fn download(&self, id: Uuid) -> AppResult<(ProjectArchive, Vec<u8>)> {
        let archive = self.repository.archives.get_by_id(id).await?;
        let bytes = self.store.download(&archive.file_path).await?;
        Ok((archive, bytes))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let archive = self.repository.archives.delete(id).await?;
        self.store.remove(&[archive.file_path.clone()]).await?;
        tracing::info!(archive_id = %id, academic_year = %archive.academic_year, "archive deleted");
        Ok(())
    }
}
