//! MySQL implementation of the UserRepository trait.
//!
//! This module provides the concrete implementation of user and profile
//! persistence using MySQL database with SQLx. User and profile rows are
//! created atomically in one transaction, and unique-key violations are
//! mapped to the matching domain conflicts.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use cm_core::domain::entities::profile::{Profile, Role};
use cm_core::domain::entities::user::{Capability, User};
use cm_core::errors::{AccountError, DomainError};
use cm_core::repositories::UserRepository;

/// MySQL implementation of the user repository
///
/// Handles all user and profile persistence operations using SQLx
/// with the MySQL database.
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let id_str: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let id = Uuid::parse_str(&id_str).map_err(|e| DomainError::Internal {
            message: format!("Invalid UUID format: {}", e),
        })?;

        let capabilities: Json<HashSet<Capability>> =
            row.try_get("capabilities").map_err(|e| DomainError::Internal {
                message: format!("Failed to get capabilities: {}", e),
            })?;

        Ok(User {
            id,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            username: row.try_get("username").map_err(|e| DomainError::Internal {
                message: format!("Failed to get username: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            is_active: row.try_get("is_active").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_active: {}", e),
            })?,
            is_staff: row.try_get("is_staff").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_staff: {}", e),
            })?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_verified: {}", e),
                })?,
            capabilities: capabilities.0,
            otp_secret: row.try_get("otp_secret").map_err(|e| DomainError::Internal {
                message: format!("Failed to get otp_secret: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }

    /// Convert a database row to a Profile entity
    fn row_to_profile(row: &MySqlRow) -> Result<Profile, DomainError> {
        let user_id_str: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let user_id = Uuid::parse_str(&user_id_str).map_err(|e| DomainError::Internal {
            message: format!("Invalid UUID format: {}", e),
        })?;

        let role_str: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("Failed to get role: {}", e),
        })?;

        let role = Role::parse(&role_str).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown role value: {}", role_str),
        })?;

        Ok(Profile {
            user_id,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get phone_number: {}", e),
                })?,
            role,
            date_of_birth: row
                .try_get::<Option<NaiveDate>, _>("date_of_birth")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get date_of_birth: {}", e),
                })?,
        })
    }

    /// Map a unique-key violation to the matching domain conflict
    ///
    /// MySQL reports duplicate keys under SQLSTATE 23000 with the violated
    /// key name in the message; anything else stays an internal error.
    fn map_unique_violation(err: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23000") {
                let message = db_err.message();
                if message.contains("email") {
                    return AccountError::EmailAlreadyRegistered.into();
                }
                if message.contains("phone_number") {
                    return AccountError::PhoneAlreadyRegistered.into();
                }
            }
        }
        DomainError::Internal {
            message: format!("Failed to persist user: {}", err),
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, password_hash, is_active, is_staff,
                   is_verified, capabilities, otp_secret, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find user by email: {}", e),
        })?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, password_hash, is_active, is_staff,
                   is_verified, capabilities, otp_secret, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find user by id: {}", e),
        })?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    async fn find_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, phone_number, role, date_of_birth
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find profile: {}", e),
        })?;

        row.map(|row| Self::row_to_profile(&row)).transpose()
    }

    async fn create_with_profile(
        &self,
        user: User,
        profile: Profile,
    ) -> Result<User, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, is_active, is_staff,
                               is_verified, capabilities, otp_secret, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_verified)
        .bind(Json(&user.capabilities))
        .bind(&user.otp_secret)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(Self::map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, phone_number, role, date_of_birth)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(profile.user_id.to_string())
        .bind(&profile.phone_number)
        .bind(profile.role.as_str())
        .bind(profile.date_of_birth)
        .execute(&mut *tx)
        .await
        .map_err(Self::map_unique_violation)?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit registration: {}", e),
        })?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut user = user;
        user.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, username = ?, password_hash = ?, is_active = ?,
                is_staff = ?, is_verified = ?, capabilities = ?, otp_secret = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_verified)
        .bind(Json(&user.capabilities))
        .bind(&user.otp_secret)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_unique_violation_fallback() {
        // Non-database errors stay internal
        let err = MySqlUserRepository::map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::Internal { .. }));
    }
}
