//! Authentication
//!
//! Handles:
//! - Local username/password accounts (bcrypt)
//! - Google and Facebook OAuth flows
//! - Server-side session state and request extractors

mod middleware;
pub mod oauth;
pub mod password;
pub mod session;

pub use middleware::{CurrentUser, MaybeUser};
pub use oauth::{OAUTH_STATE_COOKIE, OAuthProfile, OAuthProvider};
pub use session::{SESSION_COOKIE, Session, SessionStore};
