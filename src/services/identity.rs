//! Identity provider: accounts, password hashing, JWT and server-side sessions

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        profile::Profile,
        session::{Account, AuthEvent, Session, SessionClaims},
    },
    repository::{profiles::NewProfile, Repository},
    services::sessions::SessionStore,
};

/// Fan-out of sign-in and sign-out notifications
#[derive(Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send to current subscribers. Returns how many received it.
    pub fn publish(&self, event: AuthEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

#[derive(Clone)]
pub struct IdentityService {
    repository: Repository,
    config: AuthConfig,
    sessions: SessionStore,
    events: AuthEvents,
}

impl IdentityService {
    pub fn new(repository: Repository, config: AuthConfig, sessions: SessionStore) -> Self {
        Self {
            repository,
            config,
            sessions,
            events: AuthEvents::new(64),
        }
    }

    /// Create an account and its profile together
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &NewProfile,
    ) -> AppResult<(Account, Profile)> {
        let hash = hash_password(password)?;
        self.repository
            .profiles
            .create_with_account(email, &hash, profile)
            .await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<Account> {
        let invalid = || AppError::Authentication("Invalid login credentials".to_string());

        let account = self
            .repository
            .profiles
            .get_account_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&account.password_hash, password)? {
            return Err(invalid());
        }

        Ok(account)
    }

    /// Store a new session and sign a token referencing it
    pub async fn open_session(&self, account: &Account, profile: Profile) -> AppResult<(String, Session)> {
        let now = Utc::now();
        let ttl_hours = self.config.jwt_expiration_hours.max(1);
        let expires_at = now + Duration::hours(ttl_hours as i64);

        let session = Session {
            id: Uuid::new_v4(),
            account_id: account.id,
            profile,
            created_at: now,
            expires_at,
        };

        self.sessions.put(&session, ttl_hours * 3600).await?;

        let claims = SessionClaims {
            sub: account.id.to_string(),
            sid: session.id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(profile_id = %session.profile.id, session_id = %session.id, "session opened");
        self.events.publish(AuthEvent::SignedIn {
            profile_id: session.profile.id,
            session_id: session.id,
        });

        Ok((token, session))
    }

    /// Resolve a bearer token to its live session
    pub async fn current_session(&self, token: &str) -> AppResult<Session> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))?;

        self.sessions
            .get(claims.sid)
            .await?
            .ok_or_else(|| AppError::Authentication("Session has ended".to_string()))
    }

    pub async fn sign_out(&self, session: &Session) -> AppResult<()> {
        self.sessions.remove(session.id).await?;

        tracing::info!(profile_id = %session.profile.id, session_id = %session.id, "session closed");
        self.events.publish(AuthEvent::SignedOut {
            profile_id: session.profile.id,
            session_id: session.id,
        });
        Ok(())
    }

    /// Sign-in and sign-out notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "secret1").unwrap());
        assert!(!verify_password(&hash, "secret2").unwrap());
    }

    #[tokio::test]
    async fn auth_events_reach_every_subscriber() {
        let events = AuthEvents::new(8);
        let profile_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        assert_eq!(events.publish(AuthEvent::SignedOut { profile_id, session_id }), 0);

        let mut first = events.subscribe();
        let mut second = events.subscribe();
        assert_eq!(events.publish(AuthEvent::SignedIn { profile_id, session_id }), 2);
        events.publish(AuthEvent::SignedOut { profile_id, session_id });

        for rx in [&mut first, &mut second] {
            assert_eq!(
                rx.recv().await.unwrap(),
                AuthEvent::SignedIn { profile_id, session_id }
            );
            assert_eq!(
                rx.recv().await.unwrap(),
                AuthEvent::SignedOut { profile_id, session_id }
            );
        }
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("not-a-hash", "x"),
            Err(AppError::Internal(_))
        ));
    }
}
