//! Server configuration.
//!
//! Loaded from `anihan.toml` (or a `.json` file), then overridden by the
//! environment and finally by command line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file names searched for in the working directory and its parents.
pub const CONFIG_NAMES: [&str; 3] = ["anihan.toml", ".anihan.toml", "anihan.json"];

/// Effective server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Load `path` when given, otherwise the nearest config file, otherwise defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        for dir in cwd.ancestors() {
            for name in CONFIG_NAMES {
                let candidate = dir.join(name);
                if candidate.exists() {
                    return Self::load(&candidate);
                }
            }
        }
        Ok(Self::default())
    }

    /// Apply `PORT`, `ANIHAN_DATABASE_URL`, `ANIHAN_LOG_LEVEL` and
    /// `ANIHAN_LOG_FORMAT` from the process environment.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = var("ANIHAN_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(level) = var("ANIHAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ANIHAN_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(self)
    }

    /// Address to bind, e.g. `0.0.0.0:3000`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://data/anihan.db`.
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://data/anihan.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Session cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// JSON file the session cache persists to. Sessions live in memory only
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Session lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_secs: Option<i64>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
        }
    }
}

/// Generate a commented default `anihan.toml`.
pub fn generate_default_config() -> String {
    r#"# Anihan server configuration

[server]
host = "0.0.0.0"
port = 3000

[database]
url = "sqlite://data/anihan.db"

[cache]
# path = "data/sessions.json"
# session_secs = 604800

[logging]
level = "info"
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database.url, "sqlite://data/anihan.db");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.cache.path.is_none());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: ServerConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "4000"),
            ("ANIHAN_DATABASE_URL", "sqlite::memory:"),
            ("ANIHAN_LOG_LEVEL", "debug,sqlx=warn"),
            ("ANIHAN_LOG_FORMAT", "json"),
        ]
        .into();
        let config = ServerConfig::default()
            .with_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.level, "debug,sqlx=warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_env_values() {
        let bad_port = ServerConfig::default().with_vars(|name| {
            (name == "PORT").then(|| "not-a-port".to_string())
        });
        assert!(bad_port.is_err());

        let bad_format = ServerConfig::default().with_vars(|name| {
            (name == "ANIHAN_LOG_FORMAT").then(|| "xml".to_string())
        });
        assert!(bad_format.is_err());
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("anihan.toml");
        std::fs::write(&toml_path, "[server]\nport = 5000\n").unwrap();
        assert_eq!(ServerConfig::load(&toml_path).unwrap().server.port, 5000);

        let json_path = dir.path().join("anihan.json");
        std::fs::write(&json_path, r#"{"database": {"url": "sqlite::memory:"}}"#).unwrap();
        let config = ServerConfig::load(&json_path).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 3000);

        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
