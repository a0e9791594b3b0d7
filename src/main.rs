//! Department Library Server
//!
//! REST API server for the AI&DS department library.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use deptlib_server::{
    api,
    config::AppConfig,
    models::session::AuthEvent,
    repository::Repository,
    services::{sessions::SessionStore, storage::LocalObjectStore, Services},
    AppState,
};

/// Multipart framing overhead allowed on top of the archive size limit
const MULTIPART_HEADROOM: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("deptlib_server={},tower_http=debug", config.logging.level).into());

    let console_layer = if config.logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file_layer, _log_guard) = match config.logging.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "deptlib-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Starting Department Library Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Session store
    let sessions = SessionStore::new(&config.redis.url)
        .await
        .context("Failed to connect to Redis")?;

    tracing::info!("Connected to Redis");

    // Archive object store
    let store = Arc::new(LocalObjectStore::new(&config.storage.root));
    tracing::info!(root = %config.storage.root, "Archive storage ready");

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config, sessions, store);

    // Audit trail of sign-ins and sign-outs
    let mut auth_events = services.identity.subscribe();
    tokio::spawn(async move {
        loop {
            match auth_events.recv().await {
                Ok(AuthEvent::SignedIn { profile_id, session_id }) => {
                    tracing::debug!(%profile_id, %session_id, "auth event: signed in");
                }
                Ok(AuthEvent::SignedOut { profile_id, session_id }) => {
                    tracing::debug!(%profile_id, %session_id, "auth event: signed out");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    services
        .auth
        .bootstrap_librarian(&config.bootstrap)
        .await
        .context("Failed to bootstrap librarian account")?;

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().context("Invalid host address")?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.storage.max_upload_bytes + MULTIPART_HEADROOM;

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/signup", post(api::auth::signup))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Navigation
        .route("/navigation", get(api::navigation::check))
        .route("/navigation/menu", get(api::navigation::menu))
        // Registrations
        .route("/registrations", get(api::registrations::list_registrations))
        .route("/registrations/:id/approve", post(api::registrations::approve))
        .route("/registrations/:id/reject", post(api::registrations::reject))
        // Books
        .route("/public/books", get(api::books::public_search))
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route("/books/categories", get(api::books::categories))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        // Magazines
        .route(
            "/magazines",
            get(api::periodicals::list_magazines).post(api::periodicals::create_magazine),
        )
        .route(
            "/magazines/:id",
            get(api::periodicals::get_magazine)
                .put(api::periodicals::update_magazine)
                .delete(api::periodicals::delete_magazine),
        )
        // Journals
        .route(
            "/journals",
            get(api::periodicals::list_journals).post(api::periodicals::create_journal),
        )
        .route(
            "/journals/:id",
            get(api::periodicals::get_journal)
                .put(api::periodicals::update_journal)
                .delete(api::periodicals::delete_journal),
        )
        // Borrows
        .route("/borrows", get(api::borrows::list_borrows).post(api::borrows::create_borrow))
        .route("/borrows/candidates", get(api::borrows::candidates))
        .route("/borrows/overdue", get(api::borrows::overdue))
        .route("/borrows/mine", get(api::borrows::my_borrows))
        .route("/borrows/:id/return", post(api::borrows::return_borrow))
        // Archives
        .route(
            "/archives",
            get(api::archives::list_archives)
                .post(api::archives::upload_archive)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/archives/:id", delete(api::archives::delete_archive))
        .route("/archives/:id/download", get(api::archives::download_archive))
        // Reports
        .route("/reports/:report", get(api::reports::export_report))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
