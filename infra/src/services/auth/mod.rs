//! Authentication-related infrastructure services

pub mod password_hasher;

pub use password_hasher::BcryptPasswordHasher;
