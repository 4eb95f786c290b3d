//! Shared utilities and common types for the CampusMart server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Input validation helpers
//! - API response envelopes
//!
//! Everything here is free of framework and storage concerns so it can be
//! depended on by the domain, infrastructure, and API crates alike.

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    DatabaseConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use types::ErrorResponse;
pub use utils::validation;
