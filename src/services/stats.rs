//! Dashboard statistics

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{borrow::BorrowDetails, profile::ProfileStatus, session::Session},
    repository::Repository,
    services::borrows::BorrowsService,
};

const RECENT_BORROWS: i64 = 5;

/// Dashboard figures. Librarian-only counters are omitted for members.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_books: i64,
    /// Library-wide for the librarian, own loans for members
    pub active_borrows: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_registrations: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_users: Option<i64>,
    pub total_magazines: i64,
    pub total_journals: i64,
    pub recent_borrows: Vec<BorrowDetails>,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    borrows: BorrowsService,
}

impl StatsService {
    pub fn new(repository: Repository, borrows: BorrowsService) -> Self {
        Self { repository, borrows }
    }

    pub async fn dashboard(&self, session: &Session) -> AppResult<DashboardStats> {
        let scope = if session.is_librarian() {
            None
        } else {
            Some(session.profile_id())
        };

        let total_books = self.repository.books.count().await?;
        let total_magazines = self.repository.magazines.count().await?;
        let total_journals = self.repository.journals.count().await?;
        let counts = self.borrows.counts(scope).await?;
        let recent_borrows = self.borrows.recent(scope, RECENT_BORROWS).await?;

        let (pending_registrations, active_users) = if session.is_librarian() {
            let pending = self
                .repository
                .profiles
                .count_by_status(ProfileStatus::Pending)
                .await?;
            let active = self.repository.profiles.count_active_members().await?;
            (Some(pending), Some(active))
        } else {
            (None, None)
        };

        Ok(DashboardStats {
            total_books,
            active_borrows: counts.borrowed,
            pending_registrations,
            active_users,
            total_magazines,
            total_journals,
            recent_borrows,
        })
    }
}
