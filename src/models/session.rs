//! Accounts, sessions and the JWT claims that reference them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::{Profile, ProfileStatus, Role};
use crate::error::{AppError, AppResult};

/// Authentication identity, distinct from the profile
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    /// Argon2 hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Server-side session. Created on login, removed on logout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn profile_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn is_librarian(&self) -> bool {
        self.profile.role == Role::Librarian
    }

    pub fn require_librarian(&self) -> AppResult<()> {
        if self.is_librarian() {
            Ok(())
        } else {
            Err(AppError::Authorization("Librarian privileges required".to_string()))
        }
    }

    pub fn require_member(&self) -> AppResult<()> {
        if self.profile.role.is_member() {
            Ok(())
        } else {
            Err(AppError::Authorization("Student or faculty account required".to_string()))
        }
    }

    pub fn require_active(&self) -> AppResult<()> {
        match self.profile.status {
            ProfileStatus::Active => Ok(()),
            ProfileStatus::Pending => Err(AppError::AccountPending("Account is pending approval".to_string())),
            ProfileStatus::Rejected => Err(AppError::AccountRejected("Account has been rejected".to_string())),
        }
    }
}

/// JWT claims pointing at a server-side session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    /// Session id
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Sign-in / sign-out notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { profile_id: Uuid, session_id: Uuid },
    SignedOut { profile_id: Uuid, session_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_session_id() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            sid: Uuid::new_v4(),
            exp: now + 3600,
            iat: now,
        };
        let token = claims.create_token("secret").unwrap();
        let parsed = SessionClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sid, claims.sid);
        assert!(SessionClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "a".to_string(),
            sid: Uuid::new_v4(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = claims.create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }
}
