//! Librarian review of pending registrations

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::profile::{Profile, ProfileStatus, RegistrationQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct RegistrationsService {
    repository: Repository,
}

impl RegistrationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &RegistrationQuery) -> AppResult<Vec<Profile>> {
        self.repository.profiles.list_registrations(query).await
    }

    pub async fn approve(&self, profile_id: Uuid) -> AppResult<Profile> {
        self.decide(profile_id, ProfileStatus::Active).await
    }

    pub async fn reject(&self, profile_id: Uuid) -> AppResult<Profile> {
        self.decide(profile_id, ProfileStatus::Rejected).await
    }

    async fn decide(&self, profile_id: Uuid, target: ProfileStatus) -> AppResult<Profile> {
        ProfileStatus::Pending.transition(target)?;

        if let Some(updated) = self
            .repository
            .profiles
            .decide_if_pending(profile_id, target)
            .await?
        {
            tracing::info!(%profile_id, status = %updated.status, "registration decided");
            return Ok(updated);
        }

        // Nothing was pending: report why
        let current = self.repository.profiles.get_by_id(profile_id).await?;
        match current.status.transition(target) {
            Err(e) => Err(e),
            Ok(_) => Err(AppError::Conflict(
                "Registration changed while being reviewed".to_string(),
            )),
        }
    }
}
