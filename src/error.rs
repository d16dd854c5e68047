//! Error types for Confidant
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
///
/// Form-driven failures (`DuplicateUsername`, `InvalidCredentials`,
/// `OAuthExchange`) are normally intercepted by their handlers and
/// turned into redirects back to the originating form; the status
/// codes here are fallbacks.
#[derive(Debug, Error)]
pub enum AppError {
    /// Username already taken at registration (409)
    #[error("Username is already taken")]
    DuplicateUsername,

    /// Local login failed (401)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// OAuth code exchange or profile fetch failed (502)
    #[error("OAuth exchange failed: {0}")]
    OAuthExchange(String),

    /// Authentication required; browsers are redirected to /login
    #[error("Authentication required")]
    Unauthorized,

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Unauthenticated access to a protected page is a redirect to the
    /// login form, never an error page. Store and internal failures
    /// render an explicit 500 page; the originating handler has already
    /// logged the cause.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::DuplicateUsername => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::OAuthExchange(_) | AppError::HttpClient(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream authentication provider failed".to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            AppError::Config(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        tracing::error!(error = %self, status = %status, "request failed");

        let body = Html(format!(
            "<!DOCTYPE html>\n<html><head><title>Error</title></head>\
             <body><h1>{}</h1><p>{}</p></body></html>",
            status.as_u16(),
            html_escape::encode_text(&message),
        ));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn database_error_renders_explicit_500_page() {
        let error = AppError::Database(sqlx::Error::PoolClosed);
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("500"));
        assert!(body.contains("Database error"));
    }

    #[tokio::test]
    async fn internal_error_renders_explicit_500_page() {
        let error = AppError::Internal(anyhow::anyhow!("boom"));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        // Internal details stay server-side
        assert!(!body.contains("boom"));
        assert!(body.contains("Internal server error"));
    }

    #[tokio::test]
    async fn unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn oauth_exchange_failure_is_a_bad_gateway() {
        let error = AppError::OAuthExchange("token endpoint returned 400".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
