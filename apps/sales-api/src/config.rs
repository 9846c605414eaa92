//! Sales API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | variable               | default          |
//! |------------------------|------------------|
//! | `HTTP_HOST`            | `0.0.0.0`        |
//! | `HTTP_PORT`            | `8080`           |
//! | `DATABASE_PATH`        | `./data/till.db` |
//! | `DB_MAX_CONNECTIONS`   | `5`              |
//! | `SALE_TX_TIMEOUT_MS`   | `5000`           |
//! | `REQUEST_TIMEOUT_SECS` | `30`             |

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use till_db::DbConfig;

/// Sales API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Bound on one sale transaction, in milliseconds
    pub sale_tx_timeout_ms: u64,

    /// Bound on one HTTP request, in seconds
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: parse_var(&lookup, "HTTP_PORT", 8080)?,
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/till.db")),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            sale_tx_timeout_ms: parse_var(&lookup, "SALE_TX_TIMEOUT_MS", 5000)?,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        if config.sale_tx_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("SALE_TX_TIMEOUT_MS".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .transaction_timeout(Duration::from_millis(self.sale_tx_timeout_ms))
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::load_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_path, PathBuf::from("./data/till.db"));
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.db_config().transaction_timeout,
            Duration::from_millis(5000)
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "3000"),
            ("DB_MAX_CONNECTIONS", "8"),
            ("SALE_TX_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(config.db_config().max_connections, 8);
        assert_eq!(
            config.db_config().transaction_timeout,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("HTTP_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(name)) if name == "HTTP_PORT"
        ));
        assert!(load(&[("DB_MAX_CONNECTIONS", "0")]).is_err());

        let config = load(&[("HTTP_HOST", "not a host")]).unwrap();
        assert!(config.bind_addr().is_err());
    }
}
