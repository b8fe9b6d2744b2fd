//! # API Configuration Module
//!
//! Server configuration for the teambook API, loaded from the
//! environment with sensible defaults for everything except the
//! database connection.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: bind address (default: "0.0.0.0")
//! - `API_PORT`: listen port (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: trace | debug | info | warn | error (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins;
//!   unset disables CORS entirely
//! - `API_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Runtime configuration for the teambook API server.
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use teambook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address to bind (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum level the subscriber logs at
    pub log_level: Level,

    /// Allowed CORS origins; `None` leaves CORS off
    pub cors_origins: Option<Vec<String>>,

    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

impl ApiConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is unset or `API_PORT` is not a valid
    /// port number. Every other variable falls back to its default,
    /// including unparseable log levels and timeouts.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(Level::INFO);

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|timeout| timeout.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
        })
    }

    /// The `host:port` pair the server binds to.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
