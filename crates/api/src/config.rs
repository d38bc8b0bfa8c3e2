//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the SlotSync API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `STORE_BACKEND`: `postgres` or `memory` (default: "postgres")
//! - `DATABASE_URL`: PostgreSQL connection string (required for the postgres backend)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Whole-request timeout (default: 30)
//! - `RESERVATION_PRECHECK`: Skip the commit for slots already seen as booked (default: true)
//! - `STORE_TIMEOUT_MS`: Bound on each store round trip, `0` disables it (default: 5000)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use eyre::{eyre, Result, WrapErr};
use slotsync_core::coordinator::CoordinatorConfig;
use tracing::Level;

/// Where bookings, slots and mentors are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = eyre::Report;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(eyre!("Unknown STORE_BACKEND value: {}", other)),
        }
    }
}

/// Configuration for the SlotSync API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotsync_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    pub store_backend: StoreBackend,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub reservation_precheck: bool,

    pub store_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The backend is postgres and DATABASE_URL is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - STORE_BACKEND, RESERVATION_PRECHECK or STORE_TIMEOUT_MS hold unreadable values
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Storage settings
        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Postgres,
        };
        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(eyre!(
                "DATABASE_URL environment variable must be set for the postgres backend"
            ));
        }

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Reservation settings
        let reservation_precheck = match lookup("RESERVATION_PRECHECK") {
            Some(value) => parse_flag(&value).wrap_err("Invalid RESERVATION_PRECHECK value")?,
            None => true,
        };
        let store_timeout_ms: u64 = match lookup("STORE_TIMEOUT_MS") {
            Some(value) => value.parse().wrap_err("Invalid STORE_TIMEOUT_MS value")?,
            None => 5000,
        };
        let store_timeout = (store_timeout_ms > 0).then(|| Duration::from_millis(store_timeout_ms));

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            reservation_precheck,
            store_timeout,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            precheck: self.reservation_precheck,
            store_timeout: self.store_timeout,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(eyre!("expected a boolean, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_memory_backend() {
        let config = config_from(&[("STORE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.request_timeout, 30);
        assert!(config.reservation_precheck);
        assert_eq!(config.store_timeout, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(config_from(&[]).is_err());

        let config = config_from(&[("DATABASE_URL", "postgres://localhost/slotsync")]).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
    }

    #[test]
    fn test_reservation_settings() {
        let config = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("RESERVATION_PRECHECK", "off"),
            ("STORE_TIMEOUT_MS", "0"),
            ("API_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();

        let coordinator = config.coordinator_config();
        assert!(!coordinator.precheck);
        assert_eq!(coordinator.store_timeout, None);
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );

        assert!(config_from(&[("STORE_BACKEND", "memory"), ("RESERVATION_PRECHECK", "maybe")]).is_err());
        assert!(config_from(&[("STORE_BACKEND", "redis")]).is_err());
    }
}
