//! Authentication errors.

use anihan_market::MarketError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but is disabled or awaiting approval.
    #[error("Account is inactive")]
    AccountInactive,

    /// No bearer token was supplied.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Token unknown, revoked or expired.
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated, but the role doesn't allow the operation.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Password rejected before hashing.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Hashing or hash parsing failed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] anihan_cache::CacheError),

    /// Error from the account store.
    #[error(transparent)]
    Market(#[from] MarketError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated | AuthError::InvalidToken
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            AuthError::InsufficientPermissions | AuthError::AccountInactive
        )
    }
}
