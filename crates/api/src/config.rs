//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GEARSHOP_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `GEARSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `GEARSHOP_PORT` - Listen port (default: 3000)
//! - `GEARSHOP_CORS_ORIGIN` - Allowed browser origin for the front end
//! - `GEARSHOP_SHIPPING_FEE` - Flat shipping fee in đồng (default: 30000)
//! - `GEARSHOP_TOKEN_TTL_DAYS` - Bearer token lifetime (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use gearshop_core::Vnd;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Browser origin allowed by CORS (the storefront front end)
    pub cors_origin: Option<String>,
    /// Flat shipping fee applied to every order
    pub shipping_fee: Vnd,
    /// Bearer token lifetime in days
    pub token_ttl_days: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("GEARSHOP_DATABASE_URL")?;
        let host = get_env_or_default("GEARSHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GEARSHOP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GEARSHOP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GEARSHOP_PORT".to_string(), e.to_string()))?;
        let shipping_fee = get_env_or_default("GEARSHOP_SHIPPING_FEE", "30000")
            .parse::<i64>()
            .map(Vnd::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GEARSHOP_SHIPPING_FEE".to_string(), e.to_string())
            })?;
        if shipping_fee.as_i64() < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GEARSHOP_SHIPPING_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let token_ttl_days = get_env_or_default("GEARSHOP_TOKEN_TTL_DAYS", "30")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GEARSHOP_TOKEN_TTL_DAYS".to_string(), e.to_string())
            })?;
        if token_ttl_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GEARSHOP_TOKEN_TTL_DAYS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            cors_origin: get_optional_env("GEARSHOP_CORS_ORIGIN"),
            shipping_fee,
            token_ttl_days,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "0.0.0.0".parse().unwrap(),
            port: 4000,
            cors_origin: None,
            shipping_fee: Vnd::new(30_000),
            token_ttl_days: 30,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn optional_env_treats_empty_as_missing() {
        // env mutation is process-global, so use a key unique to this test
        unsafe { std::env::set_var("GEARSHOP_TEST_EMPTY_VAR", "") };
        assert_eq!(get_optional_env("GEARSHOP_TEST_EMPTY_VAR"), None);
        unsafe { std::env::set_var("GEARSHOP_TEST_EMPTY_VAR", "value") };
        assert_eq!(
            get_optional_env("GEARSHOP_TEST_EMPTY_VAR").as_deref(),
            Some("value")
        );
    }

    #[test]
    fn env_default_applies_when_unset() {
        assert_eq!(
            get_env_or_default("GEARSHOP_TEST_UNSET_VAR", "fallback"),
            "fallback"
        );
    }
}
