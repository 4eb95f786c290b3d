//! Domain entities representing core business objects.

pub mod profile;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use profile::{Profile, Role};
pub use token::{
    Claims, RevokedToken, TokenPair, TokenType,
    ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS,
    JWT_ISSUER, JWT_AUDIENCE,
};
pub use user::{has_capability, Capability, User};
