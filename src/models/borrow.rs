//! Borrow record model and loan date arithmetic

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::book::BookShort;
use super::profile::{ProfileShort, Role};

/// Default loan length
pub const LOAN_MONTHS: u32 = 6;

/// Borrow record lifecycle: borrowed, then returned exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "borrow_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Due date for a loan starting on `borrow_date`.
///
/// Adds calendar months. When the target month is shorter than the start
/// day, the date clamps to the last day of that month (Aug 31 + 6 months is
/// Feb 28, or Feb 29 in a leap year).
pub fn due_date_for(borrow_date: NaiveDate, months: u32) -> NaiveDate {
    borrow_date
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Borrow record row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub book_id: Uuid,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: BorrowStatus,
    pub returned_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl BorrowRecord {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == BorrowStatus::Borrowed && self.due_date < today
    }
}

/// Flat row produced by the borrow listing join
#[derive(Debug, Clone, FromRow)]
pub struct BorrowDetailsRow {
    pub id: Uuid,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: BorrowStatus,
    pub returned_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub book_id: Uuid,
    pub book_title: String,
    pub book_author: String,
    pub book_available_copies: i32,
    pub profile_id: Uuid,
    pub profile_name: String,
    pub profile_external_id: String,
    pub profile_role: Role,
}

/// Borrow record with book and borrower for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    pub id: Uuid,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: BorrowStatus,
    pub returned_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub book: BookShort,
    pub borrower: ProfileShort,
    pub is_overdue: bool,
}

impl BorrowDetailsRow {
    pub fn into_details(self, today: NaiveDate) -> BorrowDetails {
        let is_overdue = self.status == BorrowStatus::Borrowed && self.due_date < today;
        BorrowDetails {
            id: self.id,
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            status: self.status,
            returned_at: self.returned_at,
            created_at: self.created_at,
            book: BookShort {
                id: self.book_id,
                title: self.book_title,
                author: self.book_author,
                available_copies: self.book_available_copies,
            },
            borrower: ProfileShort {
                id: self.profile_id,
                name: self.profile_name,
                external_id: self.profile_external_id,
                role: self.profile_role,
            },
            is_overdue,
        }
    }
}

/// Create borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub profile_id: Uuid,
    pub book_id: Uuid,
}

/// Borrow listing query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BorrowQuery {
    pub status: Option<BorrowStatus>,
    /// Search in book title, borrower name or identifier
    pub q: Option<String>,
    pub profile_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Number of records per status
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BorrowCounts {
    pub borrowed: i64,
    pub returned: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_is_six_calendar_months_later() {
        assert_eq!(due_date_for(date(2026, 3, 15), LOAN_MONTHS), date(2026, 9, 15));
        assert_eq!(due_date_for(date(2026, 10, 15), LOAN_MONTHS), date(2027, 4, 15));
    }

    #[test]
    fn due_date_keeps_month_end_when_target_month_has_the_day() {
        assert_eq!(due_date_for(date(2026, 1, 31), LOAN_MONTHS), date(2026, 7, 31));
    }

    #[test]
    fn due_date_clamps_to_end_of_shorter_month() {
        assert_eq!(due_date_for(date(2026, 8, 31), LOAN_MONTHS), date(2027, 2, 28));
        assert_eq!(due_date_for(date(2027, 8, 31), LOAN_MONTHS), date(2028, 2, 29));
        assert_eq!(due_date_for(date(2026, 8, 29), LOAN_MONTHS), date(2027, 2, 28));
        assert_eq!(due_date_for(date(2026, 12, 31), LOAN_MONTHS), date(2027, 6, 30));
    }

    #[test]
    fn overdue_only_while_borrowed() {
        let mut record = BorrowRecord {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            borrow_date: date(2026, 1, 1),
            due_date: date(2026, 7, 1),
            status: BorrowStatus::Borrowed,
            returned_at: None,
            created_at: Utc::now(),
        };
        assert!(!record.is_overdue(date(2026, 7, 1)));
        assert!(record.is_overdue(date(2026, 7, 2)));

        record.status = BorrowStatus::Returned;
        record.returned_at = Some(date(2026, 7, 10));
        assert!(!record.is_overdue(date(2026, 8, 1)));
    }
}
