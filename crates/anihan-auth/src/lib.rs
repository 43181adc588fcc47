//! Authentication for Anihan.
//!
//! Provides password hashing, cache-backed login sessions, and the account
//! flows behind the `/auth` routes: login, registration, profile updates
//! and role checks.

mod accounts;
mod error;
mod password;
mod session;

pub use accounts::{Authenticator, LoginResult, ProfileUpdate, Registration};
pub use error::AuthError;
pub use password::PasswordHasher;
pub use session::{Session, SessionStore};
