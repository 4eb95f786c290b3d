pub mod token;
pub mod user;

pub use token::{MockTokenBlacklistRepository, TokenBlacklistRepository};
pub use user::{MockUserRepository, UserRepository};
