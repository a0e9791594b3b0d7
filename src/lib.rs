//! Department library server
//!
//! REST JSON API for the AI&DS department library: self-registration with
//! librarian approval, the book and periodical catalog, borrow tracking,
//! project archives and CSV reports.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
