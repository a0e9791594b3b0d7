//! Catalog service: books, magazines and journals

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{check_copies, Book, BookQuery, CreateBook, UpdateBook},
        periodical::{Journal, JournalInput, Magazine, MagazineInput, PeriodicalQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Books

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.repository.books.categories().await
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = %created.id, title = %created.title, "book added");
        Ok(created)
    }

    pub async fn update_book(&self, id: Uuid, book: UpdateBook) -> AppResult<Book> {
        book.validate()?;

        let current = self.repository.books.get_by_id(id).await?;
        let (total, available) = book.resulting_copies(&current);
        check_copies(total, available).map_err(|e| {
            AppError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid copy counts".to_string()),
            )
        })?;

        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    // Magazines

    pub async fn list_magazines(&self, query: &PeriodicalQuery) -> AppResult<Vec<Magazine>> {
        self.repository.magazines.list(query.q.as_deref()).await
    }

    pub async fn get_magazine(&self, id: Uuid) -> AppResult<Magazine> {
        self.repository.magazines.get_by_id(id).await
    }

    pub async fn create_magazine(&self, input: MagazineInput) -> AppResult<Magazine> {
        input.validate()?;
        self.repository.magazines.create(&input).await
    }

    pub async fn update_magazine(&self, id: Uuid, input: MagazineInput) -> AppResult<Magazine> {
        input.validate()?;
        self.repository.magazines.update(id, &input).await
    }

    pub async fn delete_magazine(&self, id: Uuid) -> AppResult<()> {
        self.repository.magazines.delete(id).await
    }

    // Journals

    pub async fn list_journals(&self, query: &PeriodicalQuery) -> AppResult<Vec<Journal>> {
        self.repository.journals.list(query.q.as_deref()).await
    }

    pub async fn get_journal(&self, id: Uuid) -> AppResult<Journal> {
        self.repository.journals.get_by_id(id).await
    }

    pub async fn create_journal(&self, input: JournalInput) -> AppResult<Journal> {
        input.validate()?;
        self.repository.journals.create(&input).await
    }

    pub async fn update_journal(&self, id: Uuid, input: JournalInput) -> AppResult<Journal> {
        input.validate()?;
        self.repository.journals.update(id, &input).await
    }

    pub async fn delete_journal(&self, id: Uuid) -> AppResult<()> {
        self.repository.journals.delete(id).await
    }
}
