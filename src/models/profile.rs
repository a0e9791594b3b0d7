//! Profile model: a registered person's role and approval status

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Student roll number: YY(23|24|25) + college 48 + entry 1|5 + 'A' + branch 54 + roll
pub static ROLL_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(23|24|25)48[15]A54[A-Z0-9]\d*$").expect("valid regex"));

/// Faculty id: aids_XXXXX
pub static FACULTY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^aids_\d{5}$").expect("valid regex"));

/// Ten digit mobile number starting with 6-9
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));

/// Profile role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Librarian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Librarian => "librarian",
        }
    }

    /// Students and faculty borrow books; the librarian manages the library
    pub fn is_member(&self) -> bool {
        matches!(self, Role::Student | Role::Faculty)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "profile_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Pending,
    Active,
    Rejected,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Active => "active",
            ProfileStatus::Rejected => "rejected",
        }
    }

    /// Apply a librarian decision. Only a pending registration can be decided,
    /// and a decision is either approval or rejection.
    pub fn transition(self, target: ProfileStatus) -> AppResult<ProfileStatus> {
        match (self, target) {
            (ProfileStatus::Pending, ProfileStatus::Active)
            | (ProfileStatus::Pending, ProfileStatus::Rejected) => Ok(target),
            (from, to) => Err(AppError::InvalidTransition(format!(
                "Cannot change registration status from {} to {}",
                from, to
            ))),
        }
    }
}

impl std::fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub role: Role,
    /// Roll number, faculty id or librarian id
    pub external_id: String,
    pub phone: String,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
}

/// Short profile representation embedded in borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileShort {
    pub id: Uuid,
    pub name: String,
    pub external_id: String,
    pub role: Role,
}

impl From<&Profile> for ProfileShort {
    fn from(p: &Profile) -> Self {
        ProfileShort {
            id: p.id,
            name: p.name.clone(),
            external_id: p.external_id.clone(),
            role: p.role,
        }
    }
}

/// Self-registration request (students and faculty)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_sign_up"))]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    pub role: Role,
    /// Roll number (students) or faculty id (faculty)
    pub identifier: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone must be a 10 digit number starting with 6-9"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

fn validate_sign_up(request: &SignUpRequest) -> Result<(), ValidationError> {
    validate_identifier(request.role, &request.identifier)
}

/// Check an identifier against the format required for the role
pub fn validate_identifier(role: Role, identifier: &str) -> Result<(), ValidationError> {
    let (ok, message) = match role {
        Role::Student => (
            ROLL_NUMBER_RE.is_match(identifier),
            "Invalid roll number format",
        ),
        Role::Faculty => (
            FACULTY_ID_RE.is_match(identifier),
            "Faculty id must look like aids_12345",
        ),
        Role::Librarian => (false, "Librarian accounts cannot self-register"),
    };

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("identifier");
        err.message = Some(message.into());
        Err(err)
    }
}

/// Login email synthesized from an identifier
pub fn login_email(identifier: &str, domain: &str) -> String {
    format!("{}@{}", identifier.trim().to_lowercase(), domain)
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Role selected on the login form
    pub role: Role,
}

/// Check whether an authenticated account may continue to a session.
pub fn check_login_admission(profile: Option<&Profile>, selected_role: Role) -> AppResult<&Profile> {
    let profile = profile.ok_or_else(|| {
        AppError::Authorization(
            "User profile not found. Please contact the librarian.".to_string(),
        )
    })?;

    if profile.role != selected_role {
        return Err(AppError::Authorization(
            "You are not registered with this role. Please select the correct role and try again."
                .to_string(),
        ));
    }

    match profile.status {
        ProfileStatus::Active => Ok(profile),
        ProfileStatus::Pending => Err(AppError::AccountPending(
            "Your account is pending approval. Please wait for the librarian to approve your registration."
                .to_string(),
        )),
        ProfileStatus::Rejected => Err(AppError::AccountRejected(
            "Your account has been rejected. Please contact the librarian for more information."
                .to_string(),
        )),
    }
}

/// Registration listing query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RegistrationQuery {
    pub status: Option<ProfileStatus>,
    /// Search in name or identifier
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role, status: ProfileStatus) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Asha Rao".to_string(),
            role,
            external_id: "23481A54K9".to_string(),
            phone: "9876543210".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert_eq!(
            ProfileStatus::Pending.transition(ProfileStatus::Active).unwrap(),
            ProfileStatus::Active
        );
        assert_eq!(
            ProfileStatus::Pending.transition(ProfileStatus::Rejected).unwrap(),
            ProfileStatus::Rejected
        );
    }

    #[test]
    fn decided_registrations_are_final() {
        for from in [ProfileStatus::Active, ProfileStatus::Rejected] {
            for to in [ProfileStatus::Pending, ProfileStatus::Active, ProfileStatus::Rejected] {
                assert!(matches!(
                    from.transition(to),
                    Err(AppError::InvalidTransition(_))
                ));
            }
        }
        assert!(ProfileStatus::Pending.transition(ProfileStatus::Pending).is_err());
    }

    #[test]
    fn roll_numbers() {
        assert!(ROLL_NUMBER_RE.is_match("23481A54K9"));
        assert!(ROLL_NUMBER_RE.is_match("25485a5473"));
        assert!(!ROLL_NUMBER_RE.is_match("22481A54K9"));
        assert!(!ROLL_NUMBER_RE.is_match("23482A54K9"));
        assert!(!ROLL_NUMBER_RE.is_match("23481A55K9"));
    }

    #[test]
    fn faculty_ids() {
        assert!(FACULTY_ID_RE.is_match("aids_12345"));
        assert!(FACULTY_ID_RE.is_match("AIDS_00001"));
        assert!(!FACULTY_ID_RE.is_match("aids_1234"));
        assert!(!FACULTY_ID_RE.is_match("cse_12345"));
    }

    #[test]
    fn sign_up_validation_checks_role_specific_identifier() {
        let mut request = SignUpRequest {
            name: "Asha Rao".to_string(),
            role: Role::Student,
            identifier: "23481A54K9".to_string(),
            phone: "9876543210".to_string(),
            password: "secret1".to_string(),
        };
        assert!(request.validate().is_ok());

        request.role = Role::Faculty;
        assert!(request.validate().is_err());

        request.identifier = "aids_12345".to_string();
        assert!(request.validate().is_ok());

        request.role = Role::Librarian;
        assert!(request.validate().is_err());
    }

    #[test]
    fn sign_up_validation_rejects_bad_phone_and_short_password() {
        let request = SignUpRequest {
            name: "Asha Rao".to_string(),
            role: Role::Student,
            identifier: "23481A54K9".to_string(),
            phone: "1234567890".to_string(),
            password: "12345".to_string(),
        };
        let err = AppError::from(request.validate().unwrap_err());
        let AppError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Phone"));
        assert!(msg.contains("Password"));
    }

    #[test]
    fn login_email_is_lowercased() {
        assert_eq!(
            login_email("23481A54K9", "library.edu"),
            "23481a54k9@library.edu"
        );
    }

    #[test]
    fn admission_requires_matching_role_and_active_status() {
        let active = profile(Role::Student, ProfileStatus::Active);
        assert!(check_login_admission(Some(&active), Role::Student).is_ok());
        assert!(matches!(
            check_login_admission(Some(&active), Role::Librarian),
            Err(AppError::Authorization(_))
        ));

        let pending = profile(Role::Student, ProfileStatus::Pending);
        assert!(matches!(
            check_login_admission(Some(&pending), Role::Student),
            Err(AppError::AccountPending(_))
        ));

        let rejected = profile(Role::Faculty, ProfileStatus::Rejected);
        assert!(matches!(
            check_login_admission(Some(&rejected), Role::Faculty),
            Err(AppError::AccountRejected(_))
        ));

        assert!(matches!(
            check_login_admission(None, Role::Student),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn role_mismatch_wins_over_status() {
        let pending = profile(Role::Student, ProfileStatus::Pending);
        assert!(matches!(
            check_login_admission(Some(&pending), Role::Faculty),
            Err(AppError::Authorization(_))
        ));
    }
}
