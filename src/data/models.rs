//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Auth provider
// =============================================================================

/// Where an account's identity comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProvider {
    /// Username/password account managed by us
    Local,
    /// Google OAuth account
    Google,
    /// Facebook OAuth account
    Facebook,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Google => "google",
            Self::Facebook => "facebook",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "local" => Some(Self::Local),
            "google" => Some(Self::Google),
            "facebook" => Some(Self::Facebook),
            _ => None,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// Local accounts use their email as the username and carry a bcrypt
/// password hash. OAuth accounts use the provider's opaque profile id
/// as the username and have no password hash.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    /// Unique across all providers
    pub username: String,
    /// bcrypt hash (salt embedded); None for OAuth accounts
    pub password_hash: Option<String>,
    /// Identity provider: local, google, facebook
    pub provider: String,
    /// Populated for local and Google accounts
    pub email: Option<String>,
    /// The user's single stored secret; None until submitted
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The account's identity provider
    pub fn auth_provider(&self) -> Option<AuthProvider> {
        AuthProvider::from_str(&self.provider)
    }
}
