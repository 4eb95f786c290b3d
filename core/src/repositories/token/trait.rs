//! Token blacklist repository trait for revoked-jti persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::RevokedToken;
use crate::errors::DomainError;

/// Repository trait for the revoked-token blacklist
///
/// The blacklist stores jti values of revoked refresh tokens, never token
/// values themselves. Entries outlive their usefulness once the underlying
/// token's natural expiry passes and can then be purged.
///
/// # Security Considerations
/// - Inserting an already-present jti must fail so double revocation is
///   observable
/// - Purging must only remove entries whose natural expiry has passed
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Insert a revoked token into the blacklist
    ///
    /// # Arguments
    /// * `token` - The blacklist entry to persist
    ///
    /// # Returns
    /// * `Ok(RevokedToken)` - The stored entry
    /// * `Err(DomainError)` - Insert failed; a duplicate jti surfaces as
    ///   `TokenError::TokenRevoked`
    async fn insert(&self, token: RevokedToken) -> Result<RevokedToken, DomainError>;

    /// Check whether a jti is on the blacklist
    ///
    /// # Arguments
    /// * `jti` - The JWT ID to look up
    ///
    /// # Returns
    /// * `Ok(true)` - The jti has been revoked
    /// * `Ok(false)` - The jti is not blacklisted
    /// * `Err(DomainError)` - Database error occurred
    async fn contains(&self, jti: &str) -> Result<bool, DomainError>;

    /// Delete blacklist entries whose natural expiry has passed
    ///
    /// Called periodically; the underlying tokens are dead anyway, so the
    /// entries no longer protect anything.
    ///
    /// # Arguments
    /// * `now` - The purge cutoff, normally `Utc::now()`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries removed
    /// * `Err(DomainError)` - Deletion failed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
