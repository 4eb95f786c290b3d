//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for the unauthenticated account endpoints
///
/// Each endpoint scope gets its own counter per client IP; counters live
/// in Redis and reset when their window expires.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Registrations per IP per window
    pub register_per_window: u32,

    /// OTP deliveries (resend) per IP per window
    pub otp_resend_per_window: u32,

    /// OTP verification attempts per IP per window
    pub otp_verify_per_window: u32,

    /// Login attempts per IP per window
    pub login_per_window: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            register_per_window: 10,
            otp_resend_per_window: 6,
            otp_verify_per_window: 10,
            login_per_window: 20,
            window_seconds: 3600, // 1 hour
        }
    }
}

impl RateLimitConfig {
    /// Configuration for development: generous limits
    pub fn development() -> Self {
        Self {
            register_per_window: 100,
            otp_resend_per_window: 100,
            otp_verify_per_window: 100,
            login_per_window: 100,
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `RATE_LIMIT_ENABLED`, `RATE_LIMIT_REGISTER`,
    /// `RATE_LIMIT_OTP_RESEND`, `RATE_LIMIT_OTP_VERIFY`,
    /// `RATE_LIMIT_LOGIN`, and `RATE_LIMIT_WINDOW_SECONDS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self {
            enabled: parse_var("RATE_LIMIT_ENABLED", defaults.enabled),
            register_per_window: parse_var("RATE_LIMIT_REGISTER", defaults.register_per_window),
            otp_resend_per_window: parse_var("RATE_LIMIT_OTP_RESEND", defaults.otp_resend_per_window),
            otp_verify_per_window: parse_var("RATE_LIMIT_OTP_VERIFY", defaults.otp_verify_per_window),
            login_per_window: parse_var("RATE_LIMIT_LOGIN", defaults.login_per_window),
            window_seconds: parse_var("RATE_LIMIT_WINDOW_SECONDS", defaults.window_seconds),
        }
    }
}
