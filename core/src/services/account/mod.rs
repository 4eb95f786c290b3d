//! Account workflow: registration, verification, login, logout, profile.

mod service;
mod traits;


pub use service::{AccountService, OtpSecretFactory, RegistrationData};
pub use traits::{EmailServiceTrait, PasswordHasherTrait};
