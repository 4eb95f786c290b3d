//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access/refresh pair issuance
//! - Access token validation
//! - Refresh token revocation via the jti blacklist
//! - Blacklist maintenance

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
