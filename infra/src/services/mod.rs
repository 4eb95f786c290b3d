//! Services module - Infrastructure service implementations

pub mod auth;

pub use auth::BcryptPasswordHasher;
