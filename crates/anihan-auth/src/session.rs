//! Login sessions kept in the cache.

use crate::AuthError;
use anihan_cache::{cache_key, Cache, CacheError};
use anihan_market::user::{Role, User};
use anihan_market::UserId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A login session, addressed by its bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Bearer token handed to the client.
    pub token: String,
    pub user_id: UserId,
    /// Role at login time.
    pub role: Role,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp when the session expires.
    pub expires_at: i64,
}

impl Session {
    /// Default session duration: 7 days.
    pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

    /// Start a session for `user` lasting `duration_secs`.
    pub fn start(user: &User, duration_secs: i64) -> Self {
        let now = current_timestamp();
        Self {
            token: generate_token(),
            user_id: user.id,
            role: user.role,
            created_at: now,
            expires_at: now + duration_secs,
        }
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    /// Get time until expiration in seconds.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - current_timestamp()).max(0)
    }

    /// Get cache key for a token.
    pub fn cache_key_for(token: &str) -> String {
        cache_key!("session", token)
    }
}

/// Issues, resolves and revokes sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Cache,
    duration_secs: i64,
}

impl SessionStore {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            duration_secs: Session::DEFAULT_DURATION_SECS,
        }
    }

    /// Use a custom session duration.
    pub fn with_duration(mut self, duration_secs: i64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Start and store a session for `user`, dropping expired ones first.
    pub fn issue(&self, user: &User) -> Result<Session, AuthError> {
        self.prune_expired()?;
        let session = Session::start(user, self.duration_secs);
        self.cache
            .set(&Session::cache_key_for(&session.token), &session)?;
        debug!(user_id = %user.id, "session issued");
        Ok(session)
    }

    /// Look a token up. Expired sessions are removed.
    pub fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        let key = Session::cache_key_for(token);
        let session: Session = self.cache.get(&key)?.ok_or(AuthError::InvalidToken)?;
        if session.is_expired() {
            self.cache.delete(&key)?;
            return Err(AuthError::InvalidToken);
        }
        Ok(session)
    }

    /// Remove a session. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.cache.delete(&Session::cache_key_for(token))?;
        Ok(())
    }

    /// Remove sessions past their expiry, returning how many.
    ///
    /// Unreadable entries under the session prefix are removed too.
    pub fn prune_expired(&self) -> Result<usize, AuthError> {
        let mut pruned = 0;
        for key in self.cache.keys_with_prefix("session:")? {
            let expired = match self.cache.get::<Session>(&key) {
                Ok(Some(session)) => session.is_expired(),
                Ok(None) => false,
                Err(CacheError::Encoding(_)) => true,
                Err(e) => return Err(e.into()),
            };
            if expired {
                self.cache.delete(&key)?;
                pruned += 1;
            }
        }
        if pruned > 0 {
            debug!(pruned, "expired sessions pruned");
        }
        Ok(pruned)
    }

    /// Remove every session belonging to `user_id`, returning how many.
    pub fn revoke_user(&self, user_id: UserId) -> Result<usize, AuthError> {
        let mut revoked = 0;
        for key in self.cache.keys_with_prefix("session:")? {
            if let Some(session) = self.cache.get::<Session>(&key)? {
                if session.user_id == user_id {
                    self.cache.delete(&key)?;
                    revoked += 1;
                }
            }
        }
        Ok(revoked)
    }
}

/// Generate a random URL-safe bearer token.
fn generate_token() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 24] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
