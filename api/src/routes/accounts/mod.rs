//! Account route handlers
//!
//! This module contains all account-related endpoints including:
//! - Registration with OTP delivery
//! - Email verification and OTP resend
//! - Login and logout
//! - The authenticated user's own profile

pub mod login;
pub mod logout;
pub mod me;
pub mod register;
pub mod resend_otp;
pub mod verify_email;

pub use register::AppState;
