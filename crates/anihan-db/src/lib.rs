//! SQLite access for the Anihan marketplace.
//!
//! [`Db`] wraps an sqlx pool, applies [`schema`] on open and hands rows back
//! either as dynamic [`Row`]s or deserialized into any `DeserializeOwned` type.
//!
//! ```rust,ignore
//! use anihan_db::{params, Db};
//!
//! let db = Db::open("sqlite://data/anihan.db").await?;
//! let cheap: Vec<Product> = db
//!     .query_as("SELECT * FROM products WHERE price < ?", params![100.0])
//!     .await?;
//! ```

mod builder;
mod db;
mod error;
pub mod schema;
mod types;

pub use builder::{Select, Update};
pub use db::Db;
pub use error::DbError;
pub use types::{Execution, QueryResult, Row, Value};

/// Build a `&[Value]` of bind parameters: `params!["vendor", 42, 3.5]`.
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
