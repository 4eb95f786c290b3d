//! User entity representing a registered account in the system.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat permission flag attached to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Unrestricted administrative access
    Superuser,
}

/// Checks whether a user holds the given capability
///
/// Pure lookup into the user's capability set; no role hierarchy,
/// no inheritance.
pub fn has_capability(user: &User, capability: Capability) -> bool {
    user.capabilities.contains(&capability)
}

/// User entity for the account service
///
/// A user starts unverified and becomes verified exactly once, through a
/// successful OTP check. The `otp_secret` is assigned at creation and never
/// rotated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, normalized to lowercase, globally unique
    pub email: String,

    /// Display username
    pub username: String,

    /// Bcrypt hash of the user's password
    pub password_hash: String,

    /// Whether the account is active (deactivated accounts cannot log in)
    pub is_active: bool,

    /// Whether the user is staff
    pub is_staff: bool,

    /// Whether the email address has been verified via OTP
    pub is_verified: bool,

    /// Flat set of granted capabilities
    pub capabilities: HashSet<Capability>,

    /// Base32 secret for OTP derivation, fixed for the lifetime of the account
    pub otp_secret: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user
    ///
    /// # Arguments
    ///
    /// * `email` - Normalized (lowercase) email address
    /// * `username` - Display username
    /// * `password_hash` - Already-hashed password
    /// * `otp_secret` - Base32 secret from the configured secret factory
    ///
    /// # Returns
    ///
    /// A new active, unverified `User` with no capabilities
    pub fn new(email: String, username: String, password_hash: String, otp_secret: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            is_active: true,
            is_staff: false,
            is_verified: false,
            capabilities: HashSet::new(),
            otp_secret,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the user's email as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
        self.updated_at = Utc::now();
    }

    /// Deactivates the account, blocking future logins
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivates a previously deactivated account
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Grants a capability to the user
    pub fn grant_capability(&mut self, capability: Capability) {
        if self.capabilities.insert(capability) {
            self.updated_at = Utc::now();
        }
    }

    /// Removes a capability from the user
    pub fn revoke_capability(&mut self, capability: Capability) {
        if self.capabilities.remove(&capability) {
            self.updated_at = Utc::now();
        }
    }

    /// Checks if the user holds the superuser capability
    pub fn is_superuser(&self) -> bool {
        has_capability(self, Capability::Superuser)
    }

    /// Checks if the user is allowed to authenticate
    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

// password_hash and otp_secret are redacted; the entity must never leak
// either through logs or debug output.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .field("is_verified", &self.is_verified)
            .field("capabilities", &self.capabilities)
            .field("otp_secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "alice@campus.edu".to_string(),
            "alice".to_string(),
            "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP".to_string(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();

        assert_eq!(user.email, "alice@campus.edu");
        assert_eq!(user.username, "alice");
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(!user.is_verified);
        assert!(user.capabilities.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_verify_transitions_once() {
        let mut user = sample_user();
        assert!(!user.is_verified);

        user.verify();

        assert!(user.is_verified);
        assert!(user.updated_at >= user.created_at);
    }

    #[test]
    fn test_deactivate_blocks_login() {
        let mut user = sample_user();
        assert!(user.can_login());

        user.deactivate();
        assert!(!user.is_active);
        assert!(!user.can_login());

        user.activate();
        assert!(user.can_login());
    }

    #[test]
    fn test_capability_grant_and_revoke() {
        let mut user = sample_user();
        assert!(!user.is_superuser());
        assert!(!has_capability(&user, Capability::Superuser));

        user.grant_capability(Capability::Superuser);
        assert!(user.is_superuser());
        assert!(has_capability(&user, Capability::Superuser));

        // Granting twice keeps a single entry
        user.grant_capability(Capability::Superuser);
        assert_eq!(user.capabilities.len(), 1);

        user.revoke_capability(Capability::Superuser);
        assert!(!user.is_superuser());
    }

    #[test]
    fn test_capability_serialization() {
        let json = serde_json::to_string(&Capability::Superuser).unwrap();
        assert_eq!(json, "\"superuser\"");

        let parsed: Capability = serde_json::from_str("\"superuser\"").unwrap();
        assert_eq!(parsed, Capability::Superuser);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let user = sample_user();
        let rendered = format!("{:?}", user);

        assert!(!rendered.contains("$2b$12$"));
        assert!(!rendered.contains("JBSWY3DP"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("alice@campus.edu"));
    }
}
