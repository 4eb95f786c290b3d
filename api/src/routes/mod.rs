//! HTTP route handlers, one module per endpoint group.

pub mod accounts;

pub use accounts::AppState;
