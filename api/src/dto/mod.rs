//! Request and response shapes for the HTTP API.

pub mod accounts;
pub mod error;

pub use accounts::*;
pub use error::ErrorResponse;
