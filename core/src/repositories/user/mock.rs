//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::profile::Profile;
use crate::domain::entities::user::User;
use crate::errors::{AccountError, DomainError};

use super::trait_::UserRepository;

/// In-memory user repository for tests
///
/// Enforces the same email and phone uniqueness rules as the MySQL
/// implementation so conflict paths can be exercised without a database.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Number of stored profiles
    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id).cloned())
    }

    async fn create_with_profile(
        &self,
        user: User,
        profile: Profile,
    ) -> Result<User, DomainError> {
        // Hold both write guards for the whole check-and-insert so the
        // two maps stay consistent under concurrency.
        let mut users = self.users.write().await;
        let mut profiles = self.profiles.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Account(AccountError::EmailAlreadyRegistered));
        }
        if profiles
            .values()
            .any(|p| p.phone_number == profile.phone_number)
        {
            return Err(DomainError::Account(AccountError::PhoneAlreadyRegistered));
        }

        users.insert(user.id, user.clone());
        profiles.insert(profile.user_id, profile);
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}
