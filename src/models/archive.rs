//! Project archive files, one per academic year

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectArchive {
    pub id: Uuid,
    /// e.g. "2024-2025"
    pub academic_year: String,
    pub file_name: String,
    /// Object store path, `{academic_year}/{file_name}`
    pub file_path: String,
    pub size_bytes: i64,
    /// Hex SHA-256 of the stored bytes
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Parse an academic year of the form `YYYY-YYYY` where the second year follows the first
pub fn parse_academic_year(value: &str) -> AppResult<String> {
    let invalid = || AppError::Validation(format!("Invalid academic year: {}", value));

    let (start, end) = value.trim().split_once('-').ok_or_else(invalid)?;
    let four_digits = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
    if !four_digits(start) || !four_digits(end) {
        return Err(invalid());
    }
    let first: u16 = start.parse().map_err(|_| invalid())?;
    let second: u16 = end.parse().map_err(|_| invalid())?;
    if first < 1000 || second != first + 1 {
        return Err(invalid());
    }
    Ok(format!("{}-{}", start, end))
}

/// Uploaded file names must be a single path segment
pub fn check_file_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(AppError::Validation(format!("Invalid file name: {:?}", name)));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn academic_years() {
        assert_eq!(parse_academic_year("2024-2025").unwrap(), "2024-2025");
        assert_eq!(parse_academic_year(" 2020-2021 ").unwrap(), "2020-2021");
        assert!(parse_academic_year("2024-2026").is_err());
        assert!(parse_academic_year("24-25").is_err());
        assert!(parse_academic_year("2024/2025").is_err());
        assert!(parse_academic_year("abcd-efgh").is_err());
    }

    #[test]
    fn academic_years_are_plain_four_digit_years() {
        assert!(parse_academic_year("+202-0203").is_err());
        assert!(parse_academic_year("0999-1000").is_err());
        assert!(parse_academic_year("2024-+025").is_err());
        assert!(parse_academic_year("2024- 2025").is_err());
        assert_eq!(parse_academic_year("1999-2000").unwrap(), "1999-2000");
    }

    #[test]
    fn file_names_cannot_escape_their_folder() {
        assert_eq!(check_file_name("report.pdf").unwrap(), "report.pdf");
        assert!(check_file_name("../etc/passwd").is_err());
        assert!(check_file_name("a\\b.zip").is_err());
        assert!(check_file_name("..").is_err());
        assert!(check_file_name("").is_err());
    }
}
