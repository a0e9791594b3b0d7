//! Business logic services

pub mod archives;
pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod gate;
pub mod identity;
pub mod registrations;
pub mod reports;
pub mod sessions;
pub mod stats;
pub mod storage;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub identity: identity::IdentityService,
    pub auth: auth::AuthService,
    pub registrations: registrations::RegistrationsService,
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub archives: archives::ArchivesService,
    pub reports: reports::ReportsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository, session store and object store
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        sessions: sessions::SessionStore,
        store: Arc<dyn storage::ObjectStore>,
    ) -> Self {
        let identity = identity::IdentityService::new(repository.clone(), config.auth.clone(), sessions);
        let borrows = borrows::BorrowsService::new(repository.clone(), config.library.loan_months);

        Self {
            auth: auth::AuthService::new(repository.clone(), identity.clone(), config.library.clone()),
            registrations: registrations::RegistrationsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            archives: archives::ArchivesService::new(
                repository.clone(),
                store,
                config.storage.max_upload_bytes,
            ),
            reports: reports::ReportsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone(), borrows.clone()),
            borrows,
            identity,
            repository,
        }
    }
}
