//! Time-based one-time-password derivation and verification.
//!
//! Codes are derived per RFC 6238 (TOTP) on top of RFC 4226 (HOTP) with
//! HMAC-SHA-1, a 600 second window, and 6 decimal digits. Nothing here
//! performs I/O or keeps state; the per-user secret is the only input
//! besides the clock.

use std::time::{SystemTime, UNIX_EPOCH};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::Sha1;

use crate::errors::{DomainError, DomainResult};

type HmacSha1 = Hmac<Sha1>;

/// Width of one code validity window in seconds
pub const OTP_WINDOW_SECONDS: u64 = 600;

/// Number of decimal digits in a code
pub const OTP_DIGITS: u32 = 6;

/// Raw entropy per secret before base32 encoding
const SECRET_BYTES: usize = 20;

/// Generates a fresh OTP secret
///
/// 20 bytes from the OS CSPRNG, base32-encoded (RFC 4648 alphabet, no
/// padding) into a 32-character string. This is the factory wired into
/// the account service for production use.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    base32::encode(base32::Alphabet::RFC4648 { padding: false }, &bytes)
}

/// Generates the code for the current time window
///
/// # Arguments
///
/// * `secret` - Base32-encoded OTP secret
///
/// # Returns
///
/// * `Ok(String)` - Zero-padded 6-digit code
/// * `Err(DomainError)` - The secret is not valid base32
pub fn generate(secret: &str) -> DomainResult<String> {
    generate_at(secret, unix_now())
}

/// Generates the code for the window containing an explicit timestamp
///
/// # Arguments
///
/// * `secret` - Base32-encoded OTP secret
/// * `unix_time` - Seconds since the Unix epoch
pub fn generate_at(secret: &str, unix_time: u64) -> DomainResult<String> {
    hotp(secret, unix_time / OTP_WINDOW_SECONDS)
}

/// Verifies a submitted code against the current and previous windows
///
/// Fails closed: a malformed secret, a malformed submission, or any
/// internal failure yields `false`, never an error. Comparison is
/// constant-time. Nothing is mutated; the same code stays verifiable for
/// the remainder of its windows.
pub fn verify(secret: &str, submitted: &str) -> bool {
    verify_at(secret, submitted, unix_now())
}

/// Verifies a submitted code at an explicit timestamp
///
/// Accepts codes from the window containing `unix_time` and the
/// immediately preceding one; anything older or newer is rejected.
pub fn verify_at(secret: &str, submitted: &str, unix_time: u64) -> bool {
    if submitted.len() != OTP_DIGITS as usize || !submitted.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let current = unix_time / OTP_WINDOW_SECONDS;
    let mut matched = false;

    for counter in [Some(current), current.checked_sub(1)].into_iter().flatten() {
        if let Ok(expected) = hotp(secret, counter) {
            matched |= constant_time_eq(expected.as_bytes(), submitted.as_bytes());
        }
    }

    matched
}

/// HOTP per RFC 4226: HMAC-SHA-1 over the big-endian counter with dynamic
/// truncation to `OTP_DIGITS` decimal digits.
fn hotp(secret: &str, counter: u64) -> DomainResult<String> {
    let key = base32::decode(base32::Alphabet::RFC4648 { padding: false }, secret).ok_or_else(
        || DomainError::Internal {
            message: "OTP secret is not valid base32".to_string(),
        },
    )?;

    let mut mac = HmacSha1::new_from_slice(&key).map_err(|_| DomainError::Internal {
        message: "OTP secret rejected by HMAC".to_string(),
    })?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;

    let code = binary % 10u32.pow(OTP_DIGITS);
    Ok(format!("{:0width$}", code, width = OTP_DIGITS as usize))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
