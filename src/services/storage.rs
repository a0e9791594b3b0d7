//! Object storage for project archive files

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::{AppError, AppResult};

/// Byte store addressed by relative slash-separated paths
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: &[u8]) -> AppResult<()>;

    async fn download(&self, path: &str) -> AppResult<Vec<u8>>;

    /// Remove objects. Missing objects are ignored.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;
}

/// Object store backed by a directory on the local file system
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an object path under the root. Rejects anything that could escape it.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let invalid = || AppError::Validation(format!("Invalid object path: {:?}", path));

        if path.is_empty() || path.split('/').any(str::is_empty) {
            return Err(invalid());
        }

        let relative = Path::new(path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid());
        }

        Ok(self.root.join(relative))
    }
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, path: &str, bytes: &[u8]) -> AppResult<()> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create", parent, e))?;
        }

        fs::write(&target, bytes)
            .await
            .map_err(|e| storage_error("write", &target, e))
    }

    async fn download(&self, path: &str) -> AppResult<Vec<u8>> {
        let target = self.resolve(path)?;

        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {} not found", path)))
            }
            Err(e) => Err(storage_error("read", &target, e)),
        }
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        for path in paths {
            let target = self.resolve(path)?;
            match fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path, "object already gone");
                }
                Err(e) => return Err(storage_error("remove", &target, e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (LocalObjectStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("deptlib-store-{}", uuid::Uuid::new_v4()));
        (LocalObjectStore::new(&root), root)
    }

    #[test]
    fn paths_cannot_escape_the_root() {
        let store = LocalObjectStore::new("/srv/archives");
        assert!(store.resolve("2024-2025/projects.zip").is_ok());
        assert!(store.resolve("../secret").is_err());
        assert!(store.resolve("2024-2025/../../x").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("a//b").is_err());
        assert!(store.resolve("./a").is_err());
        assert!(store.resolve("").is_err());
    }

    #[tokio::test]
    async fn upload_download_remove() {
        let (store, root) = temp_store();

        store.upload("2024-2025/projects.zip", b"zip bytes").await.unwrap();
        assert_eq!(
            store.download("2024-2025/projects.zip").await.unwrap(),
            b"zip bytes"
        );

        store
            .remove(&["2024-2025/projects.zip".to_string(), "2024-2025/missing".to_string()])
            .await
            .unwrap();
        assert!(matches!(
            store.download("2024-2025/projects.zip").await,
            Err(AppError::NotFound(_))
        ));

        let _ = std::fs::remove_dir_all(root);
    }
}
