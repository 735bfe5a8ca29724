//! Connection settings required at process start.
//!
//! Both values come from the environment (a `.env` file is loaded first by
//! `main`). A missing value is fatal: the process refuses to start rather than
//! running against a default store.

use crate::errors::{Error, Result};

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable holding the Discord bot token.
pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
/// Optional override for the store configuration path.
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Endpoint and credential needed to serve users.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Database connection URL (e.g. `sqlite://data/optima.sqlite?mode=rwc`)
    pub database_url: String,
    /// Discord bot token
    pub bot_token: String,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("database_url", &self.database_url)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl ConnectionSettings {
    /// Reads both settings from the process environment.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first variable that is missing or blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Config {
                    message: format!("{key} must be set"),
                })
        };

        Ok(Self {
            database_url: required(DATABASE_URL_VAR)?,
            bot_token: required(BOT_TOKEN_VAR)?,
        })
    }
}

/// Path of the store configuration file: `CONFIG_PATH` or `./config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string())
}
