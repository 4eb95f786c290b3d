//! Password hashing backed by bcrypt.
//!
//! Implements the core PasswordHasherTrait with the bcrypt algorithm. The
//! stored hash embeds its own salt and cost, so verification works across
//! cost changes.

use cm_core::services::PasswordHasherTrait;

/// Bcrypt implementation of the password hasher
///
/// The cost defaults to `bcrypt::DEFAULT_COST`; tests lower it to keep
/// hashing fast.
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the default bcrypt cost
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherTrait for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        bcrypt::hash(password, self.cost).map_err(|e| format!("bcrypt hashing failed: {}", e))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, String> {
        bcrypt::verify(password, hash)
            .map_err(|e| format!("bcrypt verification failed: {}", e))
    }
}
