//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where an OrderId is expected. Every ID wraps
//! the SQLite rowid of its table and serializes as a bare number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A row identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            /// Create an ID from a rowid.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying rowid.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        #[cfg(feature = "storage")]
        impl From<$name> for anihan_db::Value {
            fn from(id: $name) -> Self {
                anihan_db::Value::Integer(id.0)
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(WasteTypeId);
define_id!(WasteCategoryId);
define_id!(WasteSubmissionId);
define_id!(SourceSubmissionId);
define_id!(InventoryItemId);
define_id!(OrderId);
define_id!(DeliveryId);
