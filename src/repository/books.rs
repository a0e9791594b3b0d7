//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{like_pattern, map_constraint, paging};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookShort, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books with pagination, ordered by title
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let (_, per_page, offset) = paging(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.q.is_some() {
            conditions.push(format!(
                "(LOWER(title) LIKE ${i} OR LOWER(author) LIKE ${i} OR LOWER(publisher) LIKE ${i})",
                i = idx
            ));
            idx += 1;
        }
        if query.category.is_some() {
            conditions.push(format!("category = ${}", idx));
        }
        if query.available_only.unwrap_or(false) {
            conditions.push("available_copies > 0".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let select_sql = format!(
            "SELECT * FROM books {} ORDER BY title LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );

        let pattern = query.q.as_deref().map(like_pattern);

        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut builder = sqlx::query_as::<_, Book>(&select_sql);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
            builder = builder.bind(p);
        }
        if let Some(ref category) = query.category {
            count_builder = count_builder.bind(category);
            builder = builder.bind(category);
        }

        let total = count_builder.fetch_one(&self.pool).await?;
        let books = builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Distinct non-empty categories
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT category FROM books
            WHERE category IS NOT NULL AND category <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Books with at least one copy on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE available_copies > 0 ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Borrow candidates in short form
    pub async fn list_available_short(&self) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT id, title, author, available_copies FROM books
            WHERE available_copies > 0
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, publisher, edition, total_copies,
                               available_copies, category, cover_url, isbn)
            VALUES ($1, $2, $3, $4, NULLIF($5, ''), $6, $7, NULLIF($8, ''), NULLIF($9, ''), NULLIF($10, ''))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.publisher.trim())
        .bind(&book.edition)
        .bind(book.total_copies)
        .bind(book.initial_available())
        .bind(&book.category)
        .bind(&book.cover_url)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Book already exists"))?;
        Ok(row)
    }

    /// Update only the provided fields. An empty string clears an optional field.
    /// The copies check constraint guards the counters.
    pub async fn update(&self, id: Uuid, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title            = COALESCE($2, title),
                author           = COALESCE($3, author),
                publisher        = COALESCE($4, publisher),
                edition          = CASE WHEN $5::text IS NULL THEN edition ELSE NULLIF($5, '') END,
                total_copies     = COALESCE($6, total_copies),
                available_copies = COALESCE($7, available_copies),
                category         = CASE WHEN $8::text IS NULL THEN category ELSE NULLIF($8, '') END,
                cover_url        = CASE WHEN $9::text IS NULL THEN cover_url ELSE NULLIF($9, '') END,
                isbn             = CASE WHEN $10::text IS NULL THEN isbn ELSE NULLIF($10, '') END,
                updated_at       = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.edition)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(&book.category)
        .bind(&book.cover_url)
        .bind(&book.isbn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Book already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book and its returned history. Refused while a copy is out.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so a concurrent borrow cannot slip in
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let on_loan: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND status = 'borrowed'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if on_loan > 0 {
            return Err(AppError::BusinessRule(format!(
                "Book has {} copies on loan and cannot be deleted",
                on_loan
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
