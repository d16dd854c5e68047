//! Local username/password authentication
//!
//! Standalone functions over the user store: bcrypt hashing,
//! registration, and credential verification. Session establishment
//! is the handler layer's job.

use std::sync::OnceLock;

use bcrypt::DEFAULT_COST;
use chrono::Utc;

use crate::data::{AuthProvider, Database, EntityId, User};
use crate::error::AppError;

/// Hash a plaintext password with bcrypt (salt embedded in the output)
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(plain, DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored bcrypt hash
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(plain, hash)?)
}

/// Hash used to equalize timing when the username does not exist
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        bcrypt::hash("confidant-dummy-password", DEFAULT_COST)
            .unwrap_or_else(|_| String::new())
    })
}

/// Register a new local account.
///
/// The username doubles as the email address, matching the
/// registration form.
///
/// # Errors
/// `DuplicateUsername` if the username is already taken.
pub async fn register(db: &Database, username: &str, password: &str) -> Result<User, AppError> {
    let now = Utc::now();
    let user = User {
        id: EntityId::new().0,
        username: username.to_string(),
        password_hash: Some(hash_password(password)?),
        provider: AuthProvider::Local.as_str().to_string(),
        email: Some(username.to_string()),
        secret: None,
        created_at: now,
        updated_at: now,
    };

    db.insert_user(&user).await?;

    tracing::info!(username = %user.username, "local account registered");

    Ok(user)
}

/// Authenticate a local account.
///
/// # Errors
/// `InvalidCredentials` when the user is unknown, has no password
/// (OAuth account), or the password does not match. The unknown-user
/// path still runs a bcrypt verification so response timing does not
/// reveal whether the account exists.
pub async fn authenticate(db: &Database, username: &str, password: &str) -> Result<User, AppError> {
    let user = match db.get_user_by_username(username).await? {
        Some(user) => user,
        None => {
            let _ = verify_password(password, dummy_hash());
            return Err(AppError::InvalidCredentials);
        }
    };

    let Some(hash) = user.password_hash.as_deref() else {
        // OAuth accounts cannot log in with a password
        let _ = verify_password(password, dummy_hash());
        return Err(AppError::InvalidCredentials);
    };

    if verify_password(password, hash)? {
        Ok(user)
    } else {
        Err(AppError::InvalidCredentials)
    }
}
