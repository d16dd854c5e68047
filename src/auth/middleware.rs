//! Authentication extractors
//!
//! Reconstruct "who is making this request" from the session cookie:
//! token -> server-side session -> user row. A dangling or expired
//! token is treated as anonymous.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::session::SESSION_COOKIE;
use crate::AppState;
use crate::data::User;
use crate::error::AppError;

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

async fn lookup_user(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };

    let Some(session) = state.sessions.get(&token) else {
        return Ok(None);
    };

    // A session pointing at a deleted user is anonymous
    state.db.get_user_by_id(&session.user_id).await
}

/// Extractor for the current authenticated user
///
/// Rejects with a redirect to /login when the request carries no
/// valid session identity.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = lookup_user(&parts.headers, &app_state)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}

/// Optional current user extractor
///
/// Returns None if not authenticated, instead of redirecting.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = lookup_user(&parts.headers, &app_state).await?;

        Ok(MaybeUser(user))
    }
}
