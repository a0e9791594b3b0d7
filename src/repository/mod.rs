//! Repository layer for database operations

pub mod archives;
pub mod books;
pub mod borrows;
pub mod periodicals;
pub mod profiles;

use sqlx::{error::ErrorKind, Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub profiles: profiles::ProfilesRepository,
    pub books: books::BooksRepository,
    pub magazines: periodicals::MagazinesRepository,
    pub journals: periodicals::JournalsRepository,
    pub borrows: borrows::BorrowsRepository,
    pub archives: archives::ArchivesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            magazines: periodicals::MagazinesRepository::new(pool.clone()),
            journals: periodicals::JournalsRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            archives: archives::ArchivesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Database round trip used by the readiness probe
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map constraint violations to client errors, everything else stays a database error
pub(crate) fn map_constraint(err: sqlx::Error, conflict: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        match db.kind() {
            ErrorKind::UniqueViolation => return AppError::Conflict(conflict.to_string()),
            ErrorKind::CheckViolation => {
                return AppError::Validation(
                    "Available copies must stay between 0 and total copies".to_string(),
                )
            }
            _ => {}
        }
    }
    AppError::Database(err)
}

/// Normalized page and page size, with the offset to use
pub(crate) fn paging(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 200);
    (page, per_page, (page - 1) * per_page)
}

/// `%term%` pattern for case-insensitive LIKE searches
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_defaults_and_bounds() {
        assert_eq!(paging(None, None), (1, 20, 0));
        assert_eq!(paging(Some(3), Some(10)), (3, 10, 20));
        assert_eq!(paging(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(paging(Some(2), Some(10_000)), (2, 200, 200));
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern(" Deep "), "%deep%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("aids_1"), "%aids\\_1%");
    }
}
