//! Redis connection configuration

use serde::{Deserialize, Serialize};

/// Redis configuration (used by the rate-limiting middleware)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
        }
    }
}

impl RedisConfig {
    /// Create from environment variables
    ///
    /// Reads `REDIS_URL` and `REDIS_CONNECTION_TIMEOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            connection_timeout: std::env::var("REDIS_CONNECTION_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connection_timeout),
        }
    }
}
