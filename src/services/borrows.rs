//! Borrow/return coordinator

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::BookShort,
        borrow::{due_date_for, BorrowCounts, BorrowDetails, BorrowQuery, BorrowRecord, CreateBorrow},
        profile::ProfileShort,
    },
    repository::Repository,
};

/// What can be lent right now, and to whom
#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowCandidates {
    pub books: Vec<BookShort>,
    pub borrowers: Vec<ProfileShort>,
}

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    loan_months: u32,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl BorrowsService {
    pub fn new(repository: Repository, loan_months: u32) -> Self {
        Self {
            repository,
            loan_months,
        }
    }

    /// Lend a copy, due `loan_months` calendar months from today
    pub async fn borrow(&self, request: &CreateBorrow) -> AppResult<BorrowRecord> {
        let borrow_date = today();
        let due_date = due_date_for(borrow_date, self.loan_months);

        let record = self
            .repository
            .borrows
            .borrow(request.profile_id, request.book_id, borrow_date, due_date)
            .await?;

        tracing::info!(
            borrow_id = %record.id,
            book_id = %record.book_id,
            profile_id = %record.profile_id,
            due_date = %record.due_date,
            "book borrowed"
        );
        Ok(record)
    }

    pub async fn return_borrow(&self, borrow_id: Uuid) -> AppResult<BorrowRecord> {
        let record = self
            .repository
            .borrows
            .return_borrow(borrow_id, today())
            .await?;

        tracing::info!(borrow_id = %record.id, book_id = %record.book_id, "book returned");
        Ok(record)
    }

    pub async fn list(&self, query: &BorrowQuery) -> AppResult<(Vec<BorrowDetails>, i64)> {
        let (rows, total) = self.repository.borrows.list(query).await?;
        let today = today();
        Ok((rows.into_iter().map(|r| r.into_details(today)).collect(), total))
    }

    /// A member's own borrows, whatever profile filter was asked for
    pub async fn list_for_profile(
        &self,
        profile_id: Uuid,
        mut query: BorrowQuery,
    ) -> AppResult<(Vec<BorrowDetails>, i64)> {
        query.profile_id = Some(profile_id);
        self.list(&query).await
    }

    pub async fn recent(&self, profile_id: Option<Uuid>, limit: i64) -> AppResult<Vec<BorrowDetails>> {
        let today = today();
        let rows = self.repository.borrows.recent(profile_id, limit).await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    pub async fn overdue(&self) -> AppResult<Vec<BorrowDetails>> {
        let today = today();
        let rows = self.repository.borrows.overdue(today).await?;
        Ok(rows.into_iter().map(|r| r.into_details(today)).collect())
    }

    pub async fn counts(&self, profile_id: Option<Uuid>) -> AppResult<BorrowCounts> {
        self.repository.borrows.counts(profile_id).await
    }

    pub async fn candidates(&self) -> AppResult<BorrowCandidates> {
        let books = self.repository.books.list_available_short().await?;
        let borrowers = self
            .repository
            .profiles
            .list_active_members()
            .await?
            .iter()
            .map(ProfileShort::from)
            .collect();

        Ok(BorrowCandidates { books, borrowers })
    }
}
