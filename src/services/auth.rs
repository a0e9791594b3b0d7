//! Registration, login admission and librarian seeding

use validator::Validate;

use crate::{
    config::{BootstrapConfig, LibraryConfig},
    error::{AppError, AppResult},
    models::{
        profile::{check_login_admission, login_email, LoginRequest, Profile, ProfileStatus, Role, SignUpRequest},
        session::Session,
    },
    repository::{profiles::NewProfile, Repository},
    services::identity::IdentityService,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    identity: IdentityService,
    library: LibraryConfig,
}

impl AuthService {
    pub fn new(repository: Repository, identity: IdentityService, library: LibraryConfig) -> Self {
        Self {
            repository,
            identity,
            library,
        }
    }

    /// Self-registration of a student or faculty member. The profile starts pending.
    pub async fn register(&self, request: SignUpRequest) -> AppResult<Profile> {
        request.validate()?;

        let email = login_email(&request.identifier, &self.library.email_domain);
        let profile = NewProfile {
            name: request.name.trim().to_string(),
            role: request.role,
            external_id: request.identifier.trim().to_string(),
            phone: request.phone.trim().to_string(),
            status: ProfileStatus::Pending,
        };

        let (_, created) = self
            .identity
            .sign_up(&email, &request.password, &profile)
            .await?;

        tracing::info!(profile_id = %created.id, role = %created.role, "registration submitted");
        Ok(created)
    }

    /// Verify credentials, then admit only active profiles with the selected role
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, Session)> {
        request.validate()?;

        let email = login_email(&request.identifier, &self.library.email_domain);
        let account = self
            .identity
            .verify_credentials(&email, &request.password)
            .await?;

        let profile = self.repository.profiles.get_by_account(account.id).await?;
        let admitted = match check_login_admission(profile.as_ref(), request.role) {
            Ok(p) => p.clone(),
            Err(e) => {
                tracing::warn!(account_id = %account.id, "login refused: {}", e);
                return Err(e);
            }
        };

        self.identity.open_session(&account, admitted).await
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.identity.sign_out(session).await
    }

    /// Fresh copy of the signed-in profile
    pub async fn me(&self, session: &Session) -> AppResult<Profile> {
        self.repository.profiles.get_by_id(session.profile_id()).await
    }

    /// Create the configured librarian account if it does not exist yet
    pub async fn bootstrap_librarian(&self, config: &BootstrapConfig) -> AppResult<Option<Profile>> {
        let (Some(identifier), Some(password)) = (
            config.librarian_identifier.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            config.librarian_password.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Ok(None);
        };

        if password.len() < 6 {
            return Err(AppError::Validation(
                "Librarian password must be at least 6 characters".to_string(),
            ));
        }

        if self.repository.profiles.get_by_external_id(identifier).await?.is_some() {
            tracing::debug!(identifier, "librarian account already present");
            return Ok(None);
        }

        let profile = NewProfile {
            name: config
                .librarian_name
                .clone()
                .unwrap_or_else(|| "Librarian".to_string()),
            role: Role::Librarian,
            external_id: identifier.to_string(),
            phone: String::new(),
            status: ProfileStatus::Active,
        };
        let email = login_email(identifier, &self.library.email_domain);

        let (_, created) = self.identity.sign_up(&email, password, &profile).await?;
        tracing::info!(profile_id = %created.id, "librarian account created");
        Ok(Some(created))
    }
}
