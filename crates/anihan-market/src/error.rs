//! Marketplace error types.

use thiserror::Error;

/// Errors that can occur in marketplace operations.
#[derive(Error, Debug)]
pub enum MarketError {
    /// A record doesn't exist. Carries the display name of the entity.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An account with this email already exists.
    #[error("User with this email already exists")]
    DuplicateEmail(String),

    /// A status change that the workflow doesn't allow.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The order is past the point where it can be cancelled.
    #[error("Order cannot be cancelled in status {0}")]
    NotCancellable(String),

    /// The database rejected a write because of a constraint.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Database error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MarketError {
    /// Check if the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MarketError::Validation(_)
                | MarketError::DuplicateEmail(_)
                | MarketError::InvalidTransition { .. }
                | MarketError::NotCancellable(_)
                | MarketError::Constraint(_)
        )
    }
}

#[cfg(feature = "storage")]
impl From<anihan_db::DbError> for MarketError {
    fn from(e: anihan_db::DbError) -> Self {
        match e {
            anihan_db::DbError::Constraint(msg) => MarketError::Constraint(msg),
            other => MarketError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(e: serde_json::Error) -> Self {
        MarketError::SerializationError(e.to_string())
    }
}

/// Convenience alias for marketplace results.
pub type Result<T, E = MarketError> = std::result::Result<T, E>;
