//! MySQL implementation of the TokenBlacklistRepository trait.
//!
//! This module provides the concrete implementation of revoked-jti persistence
//! using MySQL database with SQLx. Only jti values are stored, never token
//! values themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use cm_core::domain::entities::token::RevokedToken;
use cm_core::errors::{DomainError, TokenError};
use cm_core::repositories::TokenBlacklistRepository;

/// MySQL implementation of the token blacklist repository
///
/// Backs refresh-token revocation with the `revoked_tokens` table. The jti
/// primary key makes double revocation observable as a duplicate-key error.
pub struct MySqlTokenBlacklistRepository {
    pool: MySqlPool,
}

impl MySqlTokenBlacklistRepository {
    /// Create a new MySQL token blacklist repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Map a duplicate-jti violation to the token conflict
    fn map_duplicate_jti(err: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23000") {
                return TokenError::TokenRevoked.into();
            }
        }
        DomainError::Internal {
            message: format!("Failed to insert revoked token: {}", err),
        }
    }
}

#[async_trait]
impl TokenBlacklistRepository for MySqlTokenBlacklistRepository {
    async fn insert(&self, token: RevokedToken) -> Result<RevokedToken, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, revoked_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&token.jti)
        .bind(token.user_id.to_string())
        .bind(token.revoked_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Self::map_duplicate_jti)?;

        Ok(token)
    }

    async fn contains(&self, jti: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = ?) AS revoked
            "#,
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to query blacklist: {}", e),
        })?;

        let revoked: i8 = row.try_get("revoked").map_err(|e| DomainError::Internal {
            message: format!("Failed to get revoked: {}", e),
        })?;

        Ok(revoked != 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM revoked_tokens
            WHERE expires_at <= ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to purge expired entries: {}", e),
        })?;

        Ok(result.rows_affected())
    }
}
