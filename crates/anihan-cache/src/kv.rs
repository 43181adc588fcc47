//! Key-Value store wrapper with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

type Entries = BTreeMap<String, serde_json::Value>;

/// Type-safe key-value cache.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Entries live in memory; a cache opened
/// with [`Cache::open`] also writes every change through to a JSON file so the
/// contents survive restarts.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone, Debug)]
pub struct Cache {
    entries: Arc<Mutex<Entries>>,
    path: Option<PathBuf>,
}

impl Cache {
    /// Open a cache that only lives in memory.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::in_memory();
    /// ```
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries::new())),
            path: None,
        }
    }

    /// Open a cache persisted to the JSON file at `path`.
    ///
    /// A missing file starts an empty cache. A file that can't be parsed is
    /// discarded with a warning.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("data/sessions.json")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Entries>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unreadable cache file");
                    Entries::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(CacheError::Unavailable(e.to_string())),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Unavailable(e.to_string()))?;
        }

        debug!(path = %path.display(), entries = entries.len(), "cache opened");
        Ok(Self {
            entries: Arc::new(Mutex::new(entries)),
            path: Some(path),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let users: Option<Vec<User>> = cache.get("anihan_users")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("anihan_users", &users)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    /// Delete a value from the cache.
    ///
    /// Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock()?.contains_key(key))
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    /// Get all keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.lock()?;
        entries.clear();
        self.persist(&entries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Backend("cache lock poisoned".to_string()))
    }

    fn persist(&self, entries: &Entries) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("session", token);
/// // Returns "session:<token>"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: i64,
        name: String,
    }

    #[test]
    fn test_set_get_delete() {
        let cache = Cache::in_memory();
        let item = Item {
            id: 1,
            name: "Compost".into(),
        };

        cache.set("item", &item).unwrap();
        assert!(cache.exists("item").unwrap());
        assert_eq!(cache.get::<Item>("item").unwrap(), Some(item));

        cache.delete("item").unwrap();
        assert!(!cache.exists("item").unwrap());
        assert_eq!(cache.get::<Item>("item").unwrap(), None);
        cache.delete("item").unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = Cache::in_memory();
        let other = cache.clone();
        cache.set("anihan_token", &"abc").unwrap();
        assert_eq!(other.get::<String>("anihan_token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_keys_with_prefix() {
        let cache = Cache::in_memory();
        cache.set("session:b", &1).unwrap();
        cache.set("session:a", &2).unwrap();
        cache.set("anihan_users", &3).unwrap();

        assert_eq!(cache.keys().unwrap().len(), 3);
        assert_eq!(
            cache.keys_with_prefix("session:").unwrap(),
            vec!["session:a".to_string(), "session:b".to_string()]
        );

        cache.clear().unwrap();
        assert!(cache.keys().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let cache = Cache::in_memory();
        cache.set("count", &"not a number").unwrap();
        assert!(matches!(
            cache.get::<i64>("count"),
            Err(CacheError::Encoding(_))
        ));
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let cache = Cache::open(&path).unwrap();
        cache
            .set(
                "anihan_inventory",
                &vec![Item {
                    id: 7,
                    name: "Banana Chips".into(),
                }],
            )
            .unwrap();
        drop(cache);

        let reopened = Cache::open(&path).unwrap();
        let items: Vec<Item> = reopened.get("anihan_inventory").unwrap().unwrap();
        assert_eq!(items[0].name, "Banana Chips");
    }

    #[test]
    fn test_unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let cache = Cache::open(&path).unwrap();
        assert!(cache.keys().unwrap().is_empty());
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("session", "abc"), "session:abc");
        assert_eq!(cache_key!("user", 7, "orders"), "user:7:orders");
    }
}
