//! Errors surfaced by [`Db`](crate::Db).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The connection URL was malformed or the file could not be opened.
    #[error("cannot open database: {0}")]
    Connect(String),

    #[error("SQL error: {0}")]
    QueryError(String),

    /// A UNIQUE, CHECK, NOT NULL or FOREIGN KEY constraint rejected the write.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// A row did not match the shape of the target struct.
    #[error("row does not match target type: {0}")]
    DeserializeError(String),

    /// A column held a value SQLite reports with an unsupported type.
    #[error("unsupported column value: {0}")]
    TypeError(String),

    #[error("no matching row")]
    NotFound,
}

impl DbError {
    /// Constraint failures come from bad input, not from the database.
    pub fn is_constraint(&self) -> bool {
        matches!(self, DbError::Constraint(_))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_check_violation()
                    || db.is_foreign_key_violation()
                    || db.message().contains("NOT NULL constraint") =>
            {
                DbError::Constraint(db.message().to_string())
            }
            _ => DbError::QueryError(e.to_string()),
        }
    }
}
