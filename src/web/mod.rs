//! Web layer
//!
//! Browser-facing routes and server-rendered views.

mod pages;
mod views;

use axum::{Router, routing::get};

use crate::AppState;

/// Create the application router
pub fn web_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/register", get(pages::register_form).post(pages::register))
        .route("/secrets", get(pages::secrets))
        .route("/logout", get(pages::logout))
        .route("/submit", get(pages::submit_form).post(pages::submit))
        .route("/auth/google", get(pages::google_redirect))
        .route("/auth/google/secrets", get(pages::google_callback))
        .route("/auth/facebook", get(pages::facebook_redirect))
        .route("/auth/facebook/secrets", get(pages::facebook_callback))
}
