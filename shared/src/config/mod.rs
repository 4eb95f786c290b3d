//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and token lifetime configuration
//! - `cache` - Redis connection configuration
//! - `database` - Database connection and pool configuration
//! - `rate_limit` - Per-endpoint request throttling configuration
//! - `server` - HTTP server configuration
//!
//! Every config type carries sensible development defaults and a
//! `from_env` constructor; the binary decides which to use.

pub mod auth;
pub mod cache;
pub mod database;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::RedisConfig;
pub use database::DatabaseConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
