//! Magazines and journals repositories

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::like_pattern;
use crate::{
    error::{AppError, AppResult},
    models::periodical::{blank_to_none, Journal, JournalInput, Magazine, MagazineInput},
};

#[derive(Clone)]
pub struct MagazinesRepository {
    pool: Pool<Postgres>,
}

impl MagazinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Magazine> {
        sqlx::query_as::<_, Magazine>("SELECT * FROM magazines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Magazine with id {} not found", id)))
    }

    /// Newest issues first
    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Magazine>> {
        let rows = match q.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                sqlx::query_as::<_, Magazine>(
                    r#"
                    SELECT * FROM magazines
                    WHERE LOWER(title) LIKE $1 OR LOWER(publisher) LIKE $1
                       OR LOWER(COALESCE(category, '')) LIKE $1
                    ORDER BY publication_date DESC, title
                    "#,
                )
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Magazine>(
                    "SELECT * FROM magazines ORDER BY publication_date DESC, title",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn create(&self, input: &MagazineInput) -> AppResult<Magazine> {
        let row = sqlx::query_as::<_, Magazine>(
            r#"
            INSERT INTO magazines (id, title, publisher, issue_number, publication_date, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.title.trim())
        .bind(input.publisher.trim())
        .bind(input.issue_number.trim())
        .bind(input.publication_date)
        .bind(blank_to_none(&input.category))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, input: &MagazineInput) -> AppResult<Magazine> {
        sqlx::query_as::<_, Magazine>(
            r#"
            UPDATE magazines
            SET title = $2, publisher = $3, issue_number = $4, publication_date = $5, category = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.publisher.trim())
        .bind(input.issue_number.trim())
        .bind(input.publication_date)
        .bind(blank_to_none(&input.category))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Magazine with id {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM magazines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Magazine with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM magazines")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct JournalsRepository {
    pool: Pool<Postgres>,
}

impl JournalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Journal> {
        sqlx::query_as::<_, Journal>("SELECT * FROM journals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Journal with id {} not found", id)))
    }

    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Journal>> {
        let rows = match q.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                sqlx::query_as::<_, Journal>(
                    r#"
                    SELECT * FROM journals
                    WHERE LOWER(title) LIKE $1 OR LOWER(author_editor) LIKE $1
                       OR LOWER(journal_name) LIKE $1 OR LOWER(publisher) LIKE $1
                    ORDER BY publication_date DESC, title
                    "#,
                )
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Journal>(
                    "SELECT * FROM journals ORDER BY publication_date DESC, title",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    pub async fn create(&self, input: &JournalInput) -> AppResult<Journal> {
        let row = sqlx::query_as::<_, Journal>(
            r#"
            INSERT INTO journals (id, title, author_editor, journal_name, publisher,
                                  publication_date, category, volume, issue)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.title.trim())
        .bind(input.author_editor.trim())
        .bind(input.journal_name.trim())
        .bind(input.publisher.trim())
        .bind(input.publication_date)
        .bind(blank_to_none(&input.category))
        .bind(blank_to_none(&input.volume))
        .bind(blank_to_none(&input.issue))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, input: &JournalInput) -> AppResult<Journal> {
        sqlx::query_as::<_, Journal>(
            r#"
            UPDATE journals
            SET title = $2, author_editor = $3, journal_name = $4, publisher = $5,
                publication_date = $6, category = $7, volume = $8, issue = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.title.trim())
        .bind(input.author_editor.trim())
        .bind(input.journal_name.trim())
        .bind(input.publisher.trim())
        .bind(input.publication_date)
        .bind(blank_to_none(&input.category))
        .bind(blank_to_none(&input.volume))
        .bind(blank_to_none(&input.issue))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Journal with id {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM journals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Journal with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM journals")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
