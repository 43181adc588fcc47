//! JSON key-value store shared by the server and the client.
//!
//! The server keeps login sessions under `session:{token}`. The client keeps
//! its token, the signed-in user and offline copies of the last fetched
//! collections under the `anihan_*` keys. A store is either in memory or
//! backed by one JSON file rewritten on every change.
//!
//! ```rust,ignore
//! use anihan_cache::Cache;
//!
//! let cache = Cache::open("data/client-cache.json")?;
//! cache.set("anihan_users", &users)?;
//! let users: Option<Vec<User>> = cache.get("anihan_users")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;
