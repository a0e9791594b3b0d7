//! CSV reports for the librarian

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, borrow::BorrowDetailsRow, profile::Profile},
    repository::Repository,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    BorrowRecords,
    AvailableBooks,
    ActiveUsers,
}

impl ReportKind {
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::BorrowRecords => "borrow_records",
            ReportKind::AvailableBooks => "available_books",
            ReportKind::ActiveUsers => "active_users",
        }
    }

    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.csv", self.slug(), date.format("%Y-%m-%d"))
    }
}

/// A generated report, ready to be served as an attachment
#[derive(Debug, Clone)]
pub struct CsvReport {
    pub file_name: String,
    pub content: Vec<u8>,
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or("-")
}

#[derive(Debug, Serialize)]
struct BorrowRecordRow<'a> {
    #[serde(rename = "User Name")]
    user_name: &'a str,
    #[serde(rename = "User ID")]
    user_id: &'a str,
    #[serde(rename = "Book Title")]
    book_title: &'a str,
    #[serde(rename = "Borrow Date")]
    borrow_date: NaiveDate,
    #[serde(rename = "Due Date")]
    due_date: NaiveDate,
    #[serde(rename = "Return Date")]
    return_date: String,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl<'a> From<&'a BorrowDetailsRow> for BorrowRecordRow<'a> {
    fn from(r: &'a BorrowDetailsRow) -> Self {
        Self {
            user_name: &r.profile_name,
            user_id: &r.profile_external_id,
            book_title: &r.book_title,
            borrow_date: r.borrow_date,
            due_date: r.due_date,
            return_date: r
                .returned_at
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: r.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AvailableBookRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Author")]
    author: &'a str,
    #[serde(rename = "Publisher")]
    publisher: &'a str,
    #[serde(rename = "Edition")]
    edition: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "ISBN")]
    isbn: &'a str,
    #[serde(rename = "Available Copies")]
    available_copies: i32,
    #[serde(rename = "Total Copies")]
    total_copies: i32,
}

impl<'a> From<&'a Book> for AvailableBookRow<'a> {
    fn from(b: &'a Book) -> Self {
        Self {
            title: &b.title,
            author: &b.author,
            publisher: &b.publisher,
            edition: or_dash(b.edition.as_deref()),
            category: or_dash(b.category.as_deref()),
            isbn: or_dash(b.isbn.as_deref()),
            available_copies: b.available_copies,
            total_copies: b.total_copies,
        }
    }
}

#[derive(Debug, Serialize)]
struct ActiveUserRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Role")]
    role: &'static str,
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Registered")]
    registered: NaiveDate,
}

impl<'a> From<&'a Profile> for ActiveUserRow<'a> {
    fn from(p: &'a Profile) -> Self {
        Self {
            name: &p.name,
            role: p.role.as_str(),
            id: &p.external_id,
            phone: &p.phone,
            status: p.status.as_str(),
            registered: p.created_at.date_naive(),
        }
    }
}

/// Serialize rows as CSV: a header row from the field names, `\n` line ends,
/// fields quoted when they hold a delimiter, quote or line break.
pub fn to_csv<T: Serialize>(rows: &[T]) -> AppResult<Vec<u8>> {
    if rows.is_empty() {
        return Err(AppError::NotFound("No records found to export".to_string()));
    }

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV: {}", e)))
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn generate(&self, kind: ReportKind) -> AppResult<CsvReport> {
        let content = match kind {
            ReportKind::BorrowRecords => {
                let records = self.repository.borrows.all().await?;
                let rows: Vec<BorrowRecordRow> = records.iter().map(Into::into).collect();
                to_csv(&rows)?
            }
            ReportKind::AvailableBooks => {
                let books = self.repository.books.list_available().await?;
                let rows: Vec<AvailableBookRow> = books.iter().map(Into::into).collect();
                to_csv(&rows)?
            }
            ReportKind::ActiveUsers => {
                let profiles = self.repository.profiles.list_active_members().await?;
                let rows: Vec<ActiveUserRow> = profiles.iter().map(Into::into).collect();
                to_csv(&rows)?
            }
        };

        tracing::info!(report = kind.slug(), bytes = content.len(), "report generated");

        Ok(CsvReport {
            file_name: kind.file_name(Utc::now().date_naive()),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{ProfileStatus, Role};
    use uuid::Uuid;

    fn book(title: &str, edition: Option<&str>) -> Book {
        let now = Utc::now();
        Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: "Russell, Norvig".to_string(),
            publisher: "Pearson".to_string(),
            edition: edition.map(str::to_string),
            total_copies: 3,
            available_copies: 2,
            category: None,
            cover_url: None,
            isbn: Some(String::new()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_reports_are_not_found() {
        let rows: Vec<AvailableBookRow> = Vec::new();
        assert!(matches!(to_csv(&rows), Err(AppError::NotFound(_))));
    }

    #[test]
    fn header_and_placeholders() {
        let books = vec![book("AI: A Modern Approach", Some("4th"))];
        let rows: Vec<AvailableBookRow> = books.iter().map(Into::into).collect();
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Title,Author,Publisher,Edition,Category,ISBN,Available Copies,Total Copies")
        );
        assert_eq!(
            lines.next(),
            Some("AI: A Modern Approach,\"Russell, Norvig\",Pearson,4th,-,-,2,3")
        );
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn quotes_are_doubled() {
        let books = vec![book("The \"Deep\" Book", None)];
        let rows: Vec<AvailableBookRow> = books.iter().map(Into::into).collect();
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        assert!(csv.contains("\"The \"\"Deep\"\" Book\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "The \"Deep\" Book");
        assert_eq!(&record[1], "Russell, Norvig");
        assert_eq!(&record[3], "-");
    }

    #[test]
    fn active_user_rows() {
        let profile = Profile {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Asha Rao".to_string(),
            role: Role::Student,
            external_id: "23481A54K9".to_string(),
            phone: "9876543210".to_string(),
            status: ProfileStatus::Active,
            created_at: Utc::now(),
        };
        let csv = String::from_utf8(to_csv(&[ActiveUserRow::from(&profile)]).unwrap()).unwrap();
        assert!(csv.starts_with("Name,Role,ID,Phone,Status,Registered\n"));
        assert!(csv.contains("Asha Rao,student,23481A54K9,9876543210,active,"));
    }

    #[test]
    fn report_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        assert_eq!(
            ReportKind::BorrowRecords.file_name(date),
            "borrow_records_2026-10-15.csv"
        );
        assert_eq!(
            ReportKind::ActiveUsers.file_name(date),
            "active_users_2026-10-15.csv"
        );
    }
}
