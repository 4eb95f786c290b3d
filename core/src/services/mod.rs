//! Business services containing domain logic and use cases.

pub mod account;
pub mod otp;
pub mod token;

// Re-export commonly used types
pub use account::{
    AccountService, EmailServiceTrait, OtpSecretFactory, PasswordHasherTrait, RegistrationData,
};
pub use token::{TokenService, TokenServiceConfig};
