//! Borrow ledger repository.
//!
//! Borrowing and returning change a book's available copies and the ledger
//! together, inside one transaction. The copy counter is only touched
//! through conditional updates so concurrent requests cannot overdraw it.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{like_pattern, paging};
use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowCounts, BorrowDetailsRow, BorrowQuery, BorrowRecord},
        profile::{ProfileStatus, Role},
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT br.id, br.borrow_date, br.due_date, br.status, br.returned_at, br.created_at,
           b.id AS book_id, b.title AS book_title, b.author AS book_author,
           b.available_copies AS book_available_copies,
           p.id AS profile_id, p.name AS profile_name,
           p.external_id AS profile_external_id, p.role AS profile_role
    FROM borrow_records br
    JOIN books b ON br.book_id = b.id
    JOIN profiles p ON br.profile_id = p.id
"#;

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Lend one copy of a book: decrement its available copies and open a
    /// ledger entry, atomically.
    pub async fn borrow(
        &self,
        profile_id: Uuid,
        book_id: Uuid,
        borrow_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let borrower: Option<(Role, ProfileStatus)> =
            sqlx::query_as("SELECT role, status FROM profiles WHERE id = $1")
                .bind(profile_id)
                .fetch_optional(&mut *tx)
                .await?;

        match borrower {
            None => {
                return Err(AppError::NotFound(format!(
                    "Profile with id {} not found",
                    profile_id
                )))
            }
            Some((Role::Librarian, _)) => {
                return Err(AppError::BusinessRule(
                    "Books can only be lent to students and faculty".to_string(),
                ))
            }
            Some((_, status)) if status != ProfileStatus::Active => {
                return Err(AppError::BusinessRule(format!(
                    "Borrower account is {}",
                    status
                )))
            }
            Some(_) => {}
        }

        let decremented: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1, updated_at = NOW()
            WHERE id = $1 AND available_copies > 0
            RETURNING id
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        if decremented.is_none() {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists {
                AppError::Unavailable("Book is not available".to_string())
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (id, profile_id, book_id, borrow_date, due_date, status)
            VALUES ($1, $2, $3, $4, $5, 'borrowed')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(book_id)
        .bind(borrow_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Close a ledger entry and put the copy back on the shelf, atomically.
    /// A record can be returned only once.
    pub async fn return_borrow(&self, id: Uuid, returned_at: NaiveDate) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records
            SET status = 'returned', returned_at = $2
            WHERE id = $1 AND status = 'borrowed'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .fetch_optional(&mut *tx)
        .await?;

        let record = match record {
            Some(record) => record,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrow_records WHERE id = $1)")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists {
                    AppError::InvalidTransition("Book has already been returned".to_string())
                } else {
                    AppError::NotFound(format!("Borrow record with id {} not found", id))
                });
            }
        };

        // Never exceed the total, even if the counter was edited by hand meanwhile
        sqlx::query(
            r#"
            UPDATE books
            SET available_copies = LEAST(available_copies + 1, total_copies), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// List ledger entries with book and borrower, newest first
    pub async fn list(&self, query: &BorrowQuery) -> AppResult<(Vec<BorrowDetailsRow>, i64)> {
        let (_, per_page, offset) = paging(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("br.status = ${}", idx));
            idx += 1;
        }
        if query.profile_id.is_some() {
            conditions.push(format!("br.profile_id = ${}", idx));
            idx += 1;
        }
        if query.q.is_some() {
            conditions.push(format!(
                "(LOWER(b.title) LIKE ${i} OR LOWER(p.name) LIKE ${i} OR LOWER(p.external_id) LIKE ${i})",
                i = idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            r#"
            SELECT COUNT(*) FROM borrow_records br
            JOIN books b ON br.book_id = b.id
            JOIN profiles p ON br.profile_id = p.id
            {}
            "#,
            where_clause
        );
        let select_sql = format!(
            "{} {} ORDER BY br.created_at DESC LIMIT {} OFFSET {}",
            DETAILS_SELECT, where_clause, per_page, offset
        );

        let pattern = query.q.as_deref().map(like_pattern);

        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut builder = sqlx::query_as::<_, BorrowDetailsRow>(&select_sql);
        if let Some(status) = query.status {
            count_builder = count_builder.bind(status);
            builder = builder.bind(status);
        }
        if let Some(profile_id) = query.profile_id {
            count_builder = count_builder.bind(profile_id);
            builder = builder.bind(profile_id);
        }
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
            builder = builder.bind(p);
        }

        let total = count_builder.fetch_one(&self.pool).await?;
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Most recent ledger entries, optionally for one borrower
    pub async fn recent(&self, profile_id: Option<Uuid>, limit: i64) -> AppResult<Vec<BorrowDetailsRow>> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR br.profile_id = $1) ORDER BY br.created_at DESC LIMIT $2",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, BorrowDetailsRow>(&sql)
            .bind(profile_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Every ledger entry, latest borrow first, for exports
    pub async fn all(&self) -> AppResult<Vec<BorrowDetailsRow>> {
        let sql = format!(
            "{} ORDER BY br.borrow_date DESC, br.created_at DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, BorrowDetailsRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Outstanding loans past their due date
    pub async fn overdue(&self, today: NaiveDate) -> AppResult<Vec<BorrowDetailsRow>> {
        let sql = format!(
            "{} WHERE br.status = 'borrowed' AND br.due_date < $1 ORDER BY br.due_date",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, BorrowDetailsRow>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Count records per status, optionally for one borrower
    pub async fn counts(&self, profile_id: Option<Uuid>) -> AppResult<BorrowCounts> {
        let (borrowed, returned): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'borrowed'),
                   COUNT(*) FILTER (WHERE status = 'returned')
            FROM borrow_records
            WHERE $1::uuid IS NULL OR profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(BorrowCounts { borrowed, returned })
    }
}
