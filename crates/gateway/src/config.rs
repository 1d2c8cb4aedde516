//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Interval between behaviour refresh batches.
    pub refresh_interval: Duration,
    /// Concurrent users per refresh batch.
    pub refresh_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GATEWAY_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:vita.db?mode=rwc` |
    /// | `REFRESH_INTERVAL_SECS` | Behaviour refresh interval | `21600` |
    /// | `REFRESH_CONCURRENCY` | Users refreshed concurrently | `4` |
    ///
    /// The OpenAI and Twilio variables are documented on their own
    /// config types.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("GATEWAY_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:vita.db?mode=rwc".to_string());

        let refresh_interval = env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(21_600));

        let refresh_concurrency = env::var("REFRESH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4);

        Ok(Self {
            addr,
            database_url,
            refresh_interval,
            refresh_concurrency,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid GATEWAY_ADDR format")]
    InvalidAddr,
}
