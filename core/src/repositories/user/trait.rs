//! User repository trait defining the interface for user data persistence.
//!
//! This module defines the repository pattern interface for User and Profile
//! entities. The trait is async-first and uses Result types for proper error
//! handling.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::profile::Profile;
use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// This trait defines the contract for data access operations related to users
/// and their one-to-one profiles. Implementations handle the actual database
/// operations while maintaining the abstraction boundary between domain and
/// infrastructure layers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their normalized email address
    ///
    /// # Arguments
    /// * `email` - Lowercase email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered under that email
    /// * `Err(DomainError)` - Database or other error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use cm_core::repositories::UserRepository;
    /// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// match repo.find_by_email("alice@campus.edu").await? {
    ///     Some(user) => println!("User found: {:?}", user.id),
    ///     None => println!("User not found"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find the profile belonging to a user
    ///
    /// # Arguments
    /// * `user_id` - The UUID of the owning user
    ///
    /// # Returns
    /// * `Ok(Some(Profile))` - Profile found
    /// * `Ok(None)` - User has no profile row
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError>;

    /// Create a user together with their profile in one atomic step
    ///
    /// Both records are persisted or neither is. Duplicate email or phone
    /// number surfaces as the matching `AccountError` conflict.
    ///
    /// # Arguments
    /// * `user` - The User entity to persist
    /// * `profile` - The Profile entity to persist alongside
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed, nothing was persisted
    ///
    /// # Example
    /// ```no_run
    /// # use cm_core::domain::entities::profile::{Profile, Role};
    /// # use cm_core::domain::entities::user::User;
    /// # use cm_core::repositories::UserRepository;
    /// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let user = User::new(
    ///     "alice@campus.edu".to_string(),
    ///     "alice".to_string(),
    ///     "$2b$12$hashed_password".to_string(),
    ///     "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP".to_string(),
    /// );
    /// let profile = Profile::new(user.id, "+61412345678".to_string(), Role::Student, None);
    ///
    /// let created = repo.create_with_profile(user, profile).await?;
    /// println!("Created user with ID: {}", created.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create_with_profile(&self, user: User, profile: Profile)
        -> Result<User, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Arguments
    /// * `user` - The User entity with updated fields
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError)` - Update failed (e.g. user not found)
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Check if a user exists with the given email
    ///
    /// # Arguments
    /// * `email` - Lowercase email address
    ///
    /// # Returns
    /// * `Ok(true)` - User exists
    /// * `Ok(false)` - User does not exist
    /// * `Err(DomainError)` - Database error occurred
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
