//! OAuth 2.0 authorization-code flow for Google and Facebook
//!
//! Builds consent-screen URLs, exchanges authorization codes for
//! access tokens, and fetches the provider profile. The profile id
//! becomes the account's username (provider-scoped username).

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;

use crate::config::{AppConfig, OAuthProviderConfig};
use crate::data::AuthProvider;
use crate::error::AppError;

/// Cookie carrying the CSRF state between initiation and callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Supported OAuth identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Facebook,
}

impl OAuthProvider {
    /// The store-level provider tag for accounts created by this flow
    pub fn auth_provider(&self) -> AuthProvider {
        match self {
            Self::Google => AuthProvider::Google,
            Self::Facebook => AuthProvider::Facebook,
        }
    }

    fn authorize_endpoint(&self) -> &'static str {
        match self {
            Self::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            Self::Facebook => "https://www.facebook.com/v12.0/dialog/oauth",
        }
    }

    fn token_endpoint(&self) -> &'static str {
        match self {
            Self::Google => "https://oauth2.googleapis.com/token",
            Self::Facebook => "https://graph.facebook.com/v12.0/oauth/access_token",
        }
    }

    fn userinfo_endpoint(&self) -> &'static str {
        match self {
            Self::Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            Self::Facebook => "https://graph.facebook.com/me?fields=id,name",
        }
    }

    /// Requested scopes; Facebook uses its default scope
    fn scope(&self) -> Option<&'static str> {
        match self {
            Self::Google => Some("profile email"),
            Self::Facebook => None,
        }
    }

    fn credentials<'a>(&self, config: &'a AppConfig) -> &'a OAuthProviderConfig {
        match self {
            Self::Google => &config.auth.google,
            Self::Facebook => &config.auth.facebook,
        }
    }

    /// Callback URL registered with the provider
    pub fn redirect_uri(&self, config: &AppConfig) -> String {
        let path = match self {
            Self::Google => "/auth/google/secrets",
            Self::Facebook => "/auth/facebook/secrets",
        };
        format!("{}{}", config.server.base_url(), path)
    }
}

/// Profile data derived from the provider's userinfo endpoint
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    /// The provider's opaque profile id
    pub id: String,
    /// Email, when the provider supplies one (Google only)
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacebookUserInfo {
    id: String,
}

/// Generate a random CSRF state token
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the consent-screen URL the browser is redirected to
pub fn authorize_url(provider: OAuthProvider, config: &AppConfig, state: &str) -> String {
    let credentials = provider.credentials(config);
    let mut url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&state={}",
        provider.authorize_endpoint(),
        urlencoding::encode(&credentials.client_id),
        urlencoding::encode(&provider.redirect_uri(config)),
        urlencoding::encode(state),
    );

    if let Some(scope) = provider.scope() {
        url.push_str(&format!("&scope={}", urlencoding::encode(scope)));
    }

    url
}

/// Exchange an authorization code for an access token
pub async fn exchange_code(
    provider: OAuthProvider,
    config: &AppConfig,
    http: &reqwest::Client,
    code: &str,
) -> Result<String, AppError> {
    let credentials = provider.credentials(config);

    let response = http
        .post(provider.token_endpoint())
        .form(&[
            ("code", code),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", provider.redirect_uri(config).as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::OAuthExchange(format!(
            "token endpoint returned {}",
            response.status()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::OAuthExchange(format!("malformed token response: {e}")))?;

    Ok(token.access_token)
}

/// Fetch the provider profile for an access token
pub async fn fetch_profile(
    provider: OAuthProvider,
    http: &reqwest::Client,
    access_token: &str,
) -> Result<OAuthProfile, AppError> {
    let response = http
        .get(provider.userinfo_endpoint())
        .bearer_auth(access_token)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::OAuthExchange(format!(
            "userinfo endpoint returned {}",
            response.status()
        )));
    }

    match provider {
        OAuthProvider::Google => {
            let info: GoogleUserInfo = response
                .json()
                .await
                .map_err(|e| AppError::OAuthExchange(format!("malformed userinfo: {e}")))?;
            Ok(OAuthProfile {
                id: info.id,
                email: info.email,
            })
        }
        OAuthProvider::Facebook => {
            let info: FacebookUserInfo = response
                .json()
                .await
                .map_err(|e| AppError::OAuthExchange(format!("malformed userinfo: {e}")))?;
            // Facebook profile requests omit the email scope
            Ok(OAuthProfile {
                id: info.id,
                email: None,
            })
        }
    }
}
