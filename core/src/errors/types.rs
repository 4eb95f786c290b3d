//! Domain-specific error types for account and token operations
//!
//! This module provides error type definitions for the account workflow and
//! token management. HTTP status codes and response bodies are assigned in
//! the presentation layer.

use thiserror::Error;

/// Account workflow errors
///
/// These errors represent the failure modes of registration, verification,
/// login, and profile retrieval.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Phone number already registered")]
    PhoneAlreadyRegistered,

    #[error("User not found")]
    UserNotFound,

    #[error("User already verified")]
    UserAlreadyVerified,

    #[error("Invalid or expired OTP")]
    InvalidOtp,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,
}

/// Token-related errors
///
/// These errors represent token validation and revocation failures.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
