//! Mock implementation of TokenBlacklistRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::RevokedToken;
use crate::errors::{DomainError, TokenError};

use super::r#trait::TokenBlacklistRepository;

/// In-memory token blacklist for tests
pub struct MockTokenBlacklistRepository {
    entries: Arc<RwLock<HashMap<String, RevokedToken>>>,
}

impl MockTokenBlacklistRepository {
    /// Create a new mock blacklist
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of blacklisted jti values
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the blacklist holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MockTokenBlacklistRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenBlacklistRepository for MockTokenBlacklistRepository {
    async fn insert(&self, token: RevokedToken) -> Result<RevokedToken, DomainError> {
        let mut entries = self.entries.write().await;

        if entries.contains_key(&token.jti) {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        entries.insert(token.jti.clone(), token.clone());
        Ok(token)
    }

    async fn contains(&self, jti: &str) -> Result<bool, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(jti))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut entries = self.entries.write().await;
        let initial_count = entries.len();

        entries.retain(|_, token| token.expires_at > now);

        Ok((initial_count - entries.len()) as u64)
    }
}
