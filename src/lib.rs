//! Confidant - a small secret-sharing web application
//!
//! Users register with a username/password or sign in through Google
//! or Facebook, then submit a single secret. Every logged-in user can
//! read every submitted secret.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Web Layer (Axum)               │
//! │  - Server-rendered pages                    │
//! │  - Login/registration/OAuth/secret routes   │
//! └─────────────────────────────────────────────┘
//!                       │
//! ┌─────────────────────────────────────────────┐
//! │                 Auth Layer                   │
//! │  - bcrypt password verification             │
//! │  - Google/Facebook OAuth code flow          │
//! │  - In-process session store                 │
//! └─────────────────────────────────────────────┘
//!                       │
//! ┌─────────────────────────────────────────────┐
//! │                 Data Layer                   │
//! │  - SQLite (sqlx), single users table        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `web`: HTTP handlers and HTML views
//! - `auth`: passwords, sessions, OAuth
//! - `data`: database layer
//! - `config`: configuration management
//! - `error`: error types

pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod web;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains shared
/// resources: configuration, the database pool, the session store,
/// and the HTTP client used for OAuth exchanges.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// In-process session store (volatile; cleared on restart)
    pub sessions: Arc<auth::SessionStore>,

    /// HTTP client for OAuth token exchange and profile fetches
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to the SQLite database (runs migrations)
    /// 2. Create the session store
    /// 3. Build the shared HTTP client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        let sessions = auth::SessionStore::new(config.auth.session_max_age);

        let http_client = reqwest::Client::builder()
            .user_agent("Confidant/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            sessions: Arc::new(sessions),
            http_client: Arc::new(http_client),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(web::web_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
