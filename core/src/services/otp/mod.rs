//! OTP engine module
//!
//! Stateless TOTP code derivation: secret generation, windowed code
//! generation, and constant-time verification.

pub mod engine;

pub use engine::{generate, generate_at, generate_secret, verify, verify_at};
pub use engine::{OTP_DIGITS, OTP_WINDOW_SECONDS};
