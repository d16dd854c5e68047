//! SQLite database operations
//!
//! All database access goes through this module.
//! Users are single-row reads and writes; the only multi-statement
//! operation is find-or-create, which resolves insert races by
//! re-reading the winning row.

use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::{AuthProvider, EntityId, User};
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

impl Database {
    /// Connect to the SQLite database at the given path.
    ///
    /// Creates the file and parent directories if missing, then runs
    /// embedded migrations.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user.
    ///
    /// # Errors
    /// `DuplicateUsername` if the username is already taken.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, provider, email, secret,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.provider)
        .bind(&user.email)
        .bind(&user.secret)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateUsername),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by id
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find-or-create an OAuth user keyed on the provider profile id.
    ///
    /// Looks up the user by username; inserts a fresh record if absent.
    /// If a concurrent request wins the insert, the unique violation is
    /// resolved by returning the winner's row.
    pub async fn find_or_create_oauth_user(
        &self,
        username: &str,
        provider: AuthProvider,
        email: Option<&str>,
    ) -> Result<User, AppError> {
        if let Some(user) = self.get_user_by_username(username).await? {
            return Ok(user);
        }

        let now = chrono::Utc::now();
        let user = User {
            id: EntityId::new().0,
            username: username.to_string(),
            password_hash: None,
            provider: provider.as_str().to_string(),
            email: email.map(ToOwned::to_owned),
            secret: None,
            created_at: now,
            updated_at: now,
        };

        match self.insert_user(&user).await {
            Ok(()) => Ok(user),
            Err(AppError::DuplicateUsername) => self
                .get_user_by_username(username)
                .await?
                .ok_or(AppError::DuplicateUsername),
            Err(e) => Err(e),
        }
    }

    /// Overwrite a user's secret (last write wins)
    pub async fn set_secret(&self, user_id: &str, secret: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET secret = ?, updated_at = ? WHERE id = ?")
            .bind(secret)
            .bind(chrono::Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All users that have submitted a secret, oldest account first
    pub async fn list_users_with_secrets(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE secret IS NOT NULL ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
