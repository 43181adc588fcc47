//! Shared handler state.

use crate::config::ServerConfig;
use crate::events::Events;
use anihan_auth::{Authenticator, SessionStore};
use anihan_cache::Cache;
use anihan_db::Db;
use anihan_market::Market;
use anyhow::{Context, Result};
use tracing::info;

/// Everything a handler needs, cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub market: Market,
    pub auth: Authenticator,
    pub events: Events,
}

impl AppState {
    /// Wire the stores, sessions and event channel together.
    pub fn new(market: Market, sessions: SessionStore) -> Self {
        let auth = Authenticator::new(market.users.clone(), sessions);
        Self {
            market,
            auth,
            events: Events::new(),
        }
    }

    /// In-memory database and sessions.
    pub async fn in_memory() -> Result<Self> {
        let db = Db::open_in_memory().await?;
        Ok(Self::new(
            Market::new(db),
            SessionStore::new(Cache::in_memory()),
        ))
    }

    /// Open the configured database and session cache.
    pub async fn open(config: &ServerConfig) -> Result<Self> {
        let db = Db::open(&config.database.url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;

        let cache = match &config.cache.path {
            Some(path) => Cache::open(path)
                .with_context(|| format!("Failed to open session cache {path}"))?,
            None => Cache::in_memory(),
        };
        let mut sessions = SessionStore::new(cache);
        if let Some(secs) = config.cache.session_secs {
            sessions = sessions.with_duration(secs);
        }

        info!(database = %config.database.url, "state initialized");
        Ok(Self::new(Market::new(db), sessions))
    }
}
