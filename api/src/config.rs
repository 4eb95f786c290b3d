use cm_shared::config::{DatabaseConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::env;

/// Aggregated runtime configuration for the API binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub server: ServerConfig,
    pub email_provider: String,
}

impl Config {
    /// Assembles the configuration from environment variables.
    ///
    /// Every section falls back to development defaults for unset
    /// variables; `EMAIL_PROVIDER` selects the outbound email backend
    /// (`console` or `mailgun`).
    pub fn from_env() -> Self {
        Config {
            database: DatabaseConfig::from_env(),
            redis: RedisConfig::from_env(),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            server: ServerConfig::from_env(),
            email_provider: env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "console".to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
