//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the CampusMart backend,
//! following Clean Architecture principles. It provides concrete implementations
//! for database access, email delivery, and password hashing.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL implementations using SQLx
//! - **Email**: Transactional email delivery (Mailgun, console)
//! - **Services**: Password hashing backed by bcrypt

// Re-export core types for convenience
pub use cm_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Email module - Transactional email providers
pub mod email;

/// Services module - Infrastructure service implementations
pub mod services;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Email delivery error: {0}")]
    Email(String),
}
