//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations (users table)

mod database;
mod models;

pub use database::Database;
pub use models::{AuthProvider, EntityId, User};
