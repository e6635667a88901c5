//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MEUBAIRRO_BASE_URL` - Public URL for the service
//! - `BACKEND_URL` - Base URL of the hosted row-store REST API
//! - `BACKEND_SERVICE_KEY` - Service key sent as `apikey` + bearer token
//!
//! ## Optional
//! - `MEUBAIRRO_HOST` - Bind address (default: 127.0.0.1)
//! - `MEUBAIRRO_PORT` - Listen port (default: 3000)
//! - `GEOCODER_URL` - Reverse-geocoding base URL
//!   (default: <https://nominatim.openstreetmap.org>)
//! - `GEOCODER_DELAY_MS` - Courtesy delay before each geocoding call
//!   (default: 1000)
//! - `ORDER_LINK_BASE` - Outbound messaging link base (default: <https://wa.me>)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// Hosted backend row-store configuration
    pub backend: BackendConfig,
    /// Reverse-geocoding configuration
    pub geocoder: GeocoderConfig,
    /// Outbound messaging link base for order handoff
    pub order_link_base: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Hosted backend row-store configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL of the REST API (e.g., <https://xyz.supabase.co/rest/v1>)
    pub base_url: String,
    /// Service key sent as `apikey` header and bearer token
    pub service_key: SecretString,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Reverse-geocoding configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of the reverse-geocoding service
    pub base_url: String,
    /// Fixed courtesy delay applied before every call
    pub courtesy_delay: Duration,
}

impl AppConfig {
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

        let host = get_env_or_default("MEUBAIRRO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MEUBAIRRO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MEUBAIRRO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MEUBAIRRO_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("MEUBAIRRO_BASE_URL")?;

        let backend = BackendConfig::from_env()?;
        let geocoder = GeocoderConfig::from_env()?;
        let order_link_base = get_env_or_default("ORDER_LINK_BASE", "https://wa.me");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            geocoder,
            order_link_base,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("BACKEND_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_URL".to_string(), e.to_string()))?;

        Ok(Self {
            base_url,
            service_key: get_required_secret("BACKEND_SERVICE_KEY")?,
        })
    }
}

impl GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let delay_ms = get_env_or_default("GEOCODER_DELAY_MS", "1000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GEOCODER_DELAY_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url: get_env_or_default("GEOCODER_URL", "https://nominatim.openstreetmap.org"),
            courtesy_delay: Duration::from_millis(delay_ms),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig {
                base_url: "https://backend.example.com/rest/v1".to_string(),
                service_key: SecretString::from("service-key-value"),
            },
            geocoder: GeocoderConfig {
                base_url: "https://nominatim.openstreetmap.org".to_string(),
                courtesy_delay: Duration::from_millis(1000),
            },
            order_link_base: "https://wa.me".to_string(),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_backend_config_debug_redacts_service_key() {
        let config = test_config();
        let debug_output = format!("{:?}", config.backend);

        assert!(debug_output.contains("https://backend.example.com/rest/v1"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("service-key-value"));
    }
}
