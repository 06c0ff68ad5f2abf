//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Broker connection URL
    pub redis_url: String,

    /// Environment (development, production)
    pub environment: String,

    /// Which command kinds enqueue a notification
    pub notifications: NotificationPolicy,

    /// Outbox relay tuning
    pub relay: RelayConfig,
}

/// Which command kinds enqueue a notification.
/// The historical behavior notified on create only; update and delete are
/// explicit switches rather than an implicit code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPolicy {
    pub on_create: bool,
    pub on_update: bool,
    pub on_delete: bool,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            on_create: true,
            on_update: false,
            on_delete: false,
        }
    }
}

/// Outbox relay tuning
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Rows claimed per pass
    pub batch_size: u32,

    /// Sleep between passes when the queue is empty
    pub poll_interval: Duration,

    /// Publish attempts before a row is dead-lettered
    pub max_attempts: i32,

    /// Base of the exponential retry backoff
    pub backoff_base: Duration,

    /// Age after which a claimed-but-unfinished row is released
    pub claim_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            poll_interval: Duration::from_secs(2),
            max_attempts: 8,
            backoff_base: Duration::from_secs(5),
            claim_timeout: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let notifications = NotificationPolicy {
            on_create: parse_bool("NOTIFY_ON_CREATE", true)?,
            on_update: parse_bool("NOTIFY_ON_UPDATE", false)?,
            on_delete: parse_bool("NOTIFY_ON_DELETE", false)?,
        };

        let relay = RelayConfig {
            batch_size: parse_num("RELAY_BATCH_SIZE", 50)?,
            poll_interval: Duration::from_secs(parse_num("RELAY_POLL_INTERVAL_SECS", 2)?),
            max_attempts: parse_num("RELAY_MAX_ATTEMPTS", 8)?,
            backoff_base: Duration::from_secs(parse_num("RELAY_BACKOFF_BASE_SECS", 5)?),
            claim_timeout: Duration::from_secs(parse_num("RELAY_CLAIM_TIMEOUT_SECS", 300)?),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            redis_url,
            environment,
            notifications,
            relay,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

fn parse_num<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
