//! HTTP handlers
//!
//! All browser-facing routes. Form failures redirect back to the
//! originating form; OAuth failures redirect to the login page; store
//! failures surface as an explicit error response.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use super::views;
use crate::AppState;
use crate::auth::{
    self, CurrentUser, MaybeUser, OAUTH_STATE_COOKIE, OAuthProvider, SESSION_COOKIE,
};
use crate::error::AppError;

// =============================================================================
// Cookie helpers
// =============================================================================

fn build_cookie(state: &AppState, name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.config.should_use_secure_cookies());
    cookie
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::from(name);
    cookie.set_path("/");
    cookie
}

/// Establish a logged-in session and send the browser to /secrets
fn login_redirect(state: &AppState, jar: CookieJar, user_id: &str) -> Response {
    let token = state.sessions.create(user_id);
    let jar = jar.add(build_cookie(state, SESSION_COOKIE, token));
    (jar, Redirect::to("/secrets")).into_response()
}

// =============================================================================
// Landing, login, registration
// =============================================================================

/// GET /
pub async fn home() -> Html<String> {
    Html(views::home_page())
}

/// GET /login
pub async fn login_form() -> Html<String> {
    Html(views::login_page())
}

/// Local login/registration form body
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// POST /login
///
/// Bad credentials land back on the login form; anything else is a
/// real error.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match auth::password::authenticate(&state.db, &credentials.username, &credentials.password)
        .await
    {
        Ok(user) => Ok(login_redirect(&state, jar, &user.id)),
        Err(AppError::InvalidCredentials) => {
            tracing::debug!(username = %credentials.username, "login rejected");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /register
pub async fn register_form() -> Html<String> {
    Html(views::register_page())
}

/// POST /register
///
/// Creates a local account and logs it in. A taken username lands
/// back on the registration form.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match auth::password::register(&state.db, &credentials.username, &credentials.password).await {
        Ok(user) => Ok(login_redirect(&state, jar, &user.id)),
        Err(AppError::DuplicateUsername) => {
            tracing::debug!(username = %credentials.username, "registration rejected: username taken");
            Ok(Redirect::to("/register").into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }
    let jar = jar.remove(removal_cookie(SESSION_COOKIE));
    (jar, Redirect::to("/")).into_response()
}

// =============================================================================
// Secrets
// =============================================================================

/// GET /secrets
///
/// Anonymous visitors are sent to the login form; authenticated users
/// see every submitted secret.
pub async fn secrets(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, AppError> {
    if user.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let users = state.db.list_users_with_secrets().await?;
    Ok(Html(views::secrets_page(&users)).into_response())
}

/// GET /submit
pub async fn submit_form(CurrentUser(_user): CurrentUser) -> Html<String> {
    Html(views::submit_page())
}

/// Secret submission form body
#[derive(Debug, Deserialize)]
pub struct SecretForm {
    pub secret: String,
}

/// POST /submit
///
/// Overwrites the current user's secret (last write wins).
pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<SecretForm>,
) -> Result<Response, AppError> {
    state.db.set_secret(&user.id, &form.secret).await?;
    tracing::info!(user_id = %user.id, "secret submitted");
    Ok(Redirect::to("/secrets").into_response())
}

// =============================================================================
// OAuth
// =============================================================================

/// GET /auth/google
pub async fn google_redirect(State(state): State<AppState>, jar: CookieJar) -> Response {
    oauth_redirect(state, jar, OAuthProvider::Google)
}

/// GET /auth/facebook
pub async fn facebook_redirect(State(state): State<AppState>, jar: CookieJar) -> Response {
    oauth_redirect(state, jar, OAuthProvider::Facebook)
}

fn oauth_redirect(state: AppState, jar: CookieJar, provider: OAuthProvider) -> Response {
    let csrf_state = auth::oauth::generate_state();
    let url = auth::oauth::authorize_url(provider, &state.config, &csrf_state);
    let jar = jar.add(build_cookie(&state, OAUTH_STATE_COOKIE, csrf_state));
    (jar, Redirect::to(&url)).into_response()
}

/// Query parameters from the provider callback
///
/// Both fields are absent when the user denied consent.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /auth/google/secrets
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response {
    oauth_callback(state, jar, OAuthProvider::Google, query).await
}

/// GET /auth/facebook/secrets
pub async fn facebook_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response {
    oauth_callback(state, jar, OAuthProvider::Facebook, query).await
}

/// Shared callback handling
///
/// # Steps
/// 1. Verify the CSRF state against the oauth_state cookie
/// 2. Exchange the authorization code for an access token
/// 3. Fetch the provider profile
/// 4. Find-or-create the user keyed on the profile id
/// 5. Establish a session and redirect to /secrets
///
/// Any failure sends the browser back to the login page.
async fn oauth_callback(
    state: AppState,
    jar: CookieJar,
    provider: OAuthProvider,
    query: OAuthCallbackQuery,
) -> Response {
    // Read the state cookie before queuing its removal; the state is
    // single-use either way.
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_owned());
    let jar = jar.remove(removal_cookie(OAUTH_STATE_COOKIE));

    match try_oauth_callback(&state, provider, &query, expected_state.as_deref()).await {
        Ok(user) => {
            let token = state.sessions.create(&user.id);
            let jar = jar.add(build_cookie(&state, SESSION_COOKIE, token));
            (jar, Redirect::to("/secrets")).into_response()
        }
        Err(e) => {
            tracing::warn!(provider = ?provider, error = %e, "OAuth callback failed");
            (jar, Redirect::to("/login")).into_response()
        }
    }
}

async fn try_oauth_callback(
    state: &AppState,
    provider: OAuthProvider,
    query: &OAuthCallbackQuery,
    expected_state: Option<&str>,
) -> Result<crate::data::User, AppError> {
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::OAuthExchange("missing authorization code".to_string()))?;
    let callback_state = query
        .state
        .as_deref()
        .ok_or_else(|| AppError::OAuthExchange("missing state parameter".to_string()))?;

    let expected_state = expected_state
        .ok_or_else(|| AppError::OAuthExchange("missing state cookie".to_string()))?;

    if callback_state != expected_state {
        return Err(AppError::OAuthExchange("state mismatch".to_string()));
    }

    let access_token =
        auth::oauth::exchange_code(provider, &state.config, &state.http_client, code).await?;
    let profile = auth::oauth::fetch_profile(provider, &state.http_client, &access_token).await?;

    state
        .db
        .find_or_create_oauth_user(
            &profile.id,
            provider.auth_provider(),
            profile.email.as_deref(),
        )
        .await
}
