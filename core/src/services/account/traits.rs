//! Collaborator traits for the account workflow.
//!
//! The account service talks to email delivery and password hashing through
//! these traits so the workflow stays testable without real providers.

use async_trait::async_trait;

/// Outbound email delivery.
///
/// Implementations return the provider's message identifier on success so
/// callers can log delivery without parsing provider payloads.
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send a plain-text email to `recipient`.
    ///
    /// # Arguments
    ///
    /// * `recipient` - Destination email address
    /// * `subject` - Message subject line
    /// * `body` - Plain-text message body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Provider message id
    /// * `Err(String)` - Provider error description
    async fn send_email(&self, recipient: &str, subject: &str, body: &str)
        -> Result<String, String>;
}

/// Password hashing and verification.
///
/// Kept synchronous: hashing cost is bounded and callers run it on the
/// request path where an executor hop buys nothing.
pub trait PasswordHasherTrait: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, String>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, String>;
}
