//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Which persistence backend holds budgets, expenses, and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    /// Pretty-printed JSON files under `data_dir`.
    #[default]
    Json,
    /// Process memory only; nothing survives a restart.
    Memory,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StorageBackendKind,
    /// Directory holding `budgets.json`, `expenses.json`, and `users.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86400 // 1 day
}

/// Upper bound on token lifetime, ten years in minutes.
const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: u64 = 10 * 365 * 24 * 60;

impl JwtSettings {
    /// Token lifetime in whole minutes, rounded up and capped at ten years.
    ///
    /// A configured value below one minute still yields a one-minute token.
    #[must_use]
    pub fn access_token_expiry_minutes(&self) -> i64 {
        let minutes = self
            .access_token_expiry_secs
            .div_ceil(60)
            .clamp(1, MAX_ACCESS_TOKEN_EXPIRY_MINUTES);
        i64::try_from(minutes).unwrap_or(i64::MAX)
    }
}

/// Display configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Currency used when formatting amounts.
    #[serde(default)]
    pub currency: Currency,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGEIN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_from_env() {
        temp_env::with_vars(
            [
                ("BUDGEIN__JWT__SECRET", Some("env-secret")),
                ("BUDGEIN__SERVER__PORT", None::<&str>),
                ("BUDGEIN__STORAGE__BACKEND", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 86400);
                assert_eq!(config.server.port, 3001);
                assert_eq!(config.storage.backend, StorageBackendKind::Json);
                assert_eq!(config.storage.data_dir, PathBuf::from("data"));
                assert_eq!(config.display.currency, Currency::Idr);
            },
        );
    }

    #[test]
    fn test_expiry_minutes_round_up() {
        let settings = |secs| JwtSettings {
            secret: "secret".to_string(),
            access_token_expiry_secs: secs,
        };

        assert_eq!(settings(86400).access_token_expiry_minutes(), 1440);
        assert_eq!(settings(90).access_token_expiry_minutes(), 2);
        assert_eq!(settings(30).access_token_expiry_minutes(), 1);
        assert_eq!(settings(0).access_token_expiry_minutes(), 1);
        assert_eq!(
            settings(u64::MAX).access_token_expiry_minutes(),
            10 * 365 * 24 * 60
        );
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("BUDGEIN__JWT__SECRET", Some("env-secret")),
                ("BUDGEIN__SERVER__PORT", Some("9090")),
                ("BUDGEIN__STORAGE__BACKEND", Some("memory")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.storage.backend, StorageBackendKind::Memory);
            },
        );
    }

    #[test]
    fn test_missing_secret_fails() {
        temp_env::with_var("BUDGEIN__JWT__SECRET", None::<&str>, || {
            assert!(AppConfig::load().is_err());
        });
    }
}
