//! Account lifecycle service.
//!
//! Implements registration, email verification, login, logout and profile
//! retrieval on top of the repository and delivery traits. Accounts move
//! one way: unregistered, pending verification, verified.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use cm_shared::utils::validation::{
    is_valid_email, is_valid_phone_number, is_valid_username, normalize_email, not_empty,
    ValidationErrors,
};
use uuid::Uuid;

use crate::domain::entities::{Profile, Role, User};
use crate::domain::value_objects::{AuthResponse, UserView};
use crate::errors::{AccountError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenBlacklistRepository, UserRepository};
use crate::services::otp;
use crate::services::token::TokenService;

use super::traits::{EmailServiceTrait, PasswordHasherTrait};

/// Produces the base32 secret stored on a freshly registered account.
///
/// Injected so tests can pin the secret and compute expected codes.
pub type OtpSecretFactory = fn() -> String;

/// Raw registration input, validated by [`AccountService::register`].
#[derive(Clone)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .field("role", &self.role)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

/// Orchestrates the account workflow over injected collaborators.
pub struct AccountService<U, B, E, P>
where
    U: UserRepository,
    B: TokenBlacklistRepository,
    E: EmailServiceTrait,
    P: PasswordHasherTrait,
{
    user_repository: Arc<U>,
    token_service: Arc<TokenService<B>>,
    email_service: Arc<E>,
    password_hasher: Arc<P>,
    secret_factory: OtpSecretFactory,
}

impl<U, B, E, P> AccountService<U, B, E, P>
where
    U: UserRepository,
    B: TokenBlacklistRepository,
    E: EmailServiceTrait,
    P: PasswordHasherTrait,
{
    /// Creates the service with all collaborators injected.
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<B>>,
        email_service: Arc<E>,
        password_hasher: Arc<P>,
        secret_factory: OtpSecretFactory,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            email_service,
            password_hasher,
            secret_factory,
        }
    }

    /// Registers a new, unverified account and dispatches its first
    /// verification code.
    ///
    /// All field failures are collected into one [`DomainError::Fields`] so
    /// the caller sees every problem at once. Duplicate email or phone
    /// surface as conflicts from the repository. Code delivery is
    /// best-effort: a provider failure is logged and the registration
    /// still succeeds.
    pub async fn register(&self, data: RegistrationData) -> DomainResult<User> {
        // 1. Validate every field, collecting all failures
        let email = normalize_email(&data.email);
        let mut errors = ValidationErrors::new();

        if !not_empty(&data.username) {
            errors.add_error("username", "This field may not be blank.", "blank");
        } else if !is_valid_username(&data.username) {
            errors.add_error(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, \
                 and @/./+/-/_ characters.",
                "invalid",
            );
        }

        if !not_empty(&email) {
            errors.add_error("email", "This field may not be blank.", "blank");
        } else if !is_valid_email(&email) {
            errors.add_error("email", "Enter a valid email address.", "invalid");
        }

        if !not_empty(&data.password) {
            errors.add_error("password", "This field may not be blank.", "blank");
        }

        if !not_empty(&data.phone_number) {
            errors.add_error("phone_number", "This field may not be blank.", "blank");
        } else if !is_valid_phone_number(&data.phone_number) {
            errors.add_error("phone_number", "Enter a valid phone number.", "invalid");
        }

        if Role::parse(&data.role).is_none() {
            errors.add_error(
                "role",
                format!("\"{}\" is not a valid choice.", data.role),
                "invalid_choice",
            );
        }

        if errors.has_errors() {
            return Err(DomainError::Fields(errors));
        }

        let role = Role::parse(&data.role).ok_or_else(|| DomainError::Internal {
            message: "role rejected after validation".to_string(),
        })?;

        // 2. Hash the password before anything is persisted
        let password_hash =
            self.password_hasher
                .hash(&data.password)
                .map_err(|e| DomainError::Internal {
                    message: format!("Password hashing failed: {}", e),
                })?;

        // 3. Build the unverified user with a fresh secret
        let otp_secret = (self.secret_factory)();
        let user = User::new(email, data.username, password_hash, otp_secret);
        let profile = Profile::new(user.id, data.phone_number, role, data.date_of_birth);

        // 4. Persist user and profile atomically
        let created = self.user_repository.create_with_profile(user, profile).await?;

        // 5. Dispatch the verification code, best-effort
        self.send_verification_email(&created).await;

        tracing::info!(
            user_id = %created.id,
            event = "user_registered",
            "User registered, pending email verification"
        );

        Ok(created)
    }

    /// Re-sends the verification code for a pending account.
    ///
    /// The code is recomputed from the stored secret; the secret itself is
    /// never rotated here, so a previously delivered code stays valid for
    /// the remainder of its window.
    pub async fn resend_otp(&self, email: &str) -> DomainResult<()> {
        // 1. Look up the account
        let email = normalize_email(email);
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        // 2. Verified accounts have nothing left to verify
        if user.is_verified {
            return Err(AccountError::UserAlreadyVerified.into());
        }

        // 3. Recompute from the stored secret and redispatch
        self.send_verification_email(&user).await;

        tracing::info!(
            user_id = %user.id,
            event = "otp_resent",
            "Verification code re-sent"
        );

        Ok(())
    }

    /// Verifies an account with a submitted code.
    ///
    /// Wrong and expired codes are deliberately indistinguishable. A valid
    /// code against an already verified account succeeds without a write.
    pub async fn verify_email(&self, email: &str, code: &str) -> DomainResult<User> {
        // 1. Look up the account
        let email = normalize_email(email);
        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        // 2. Check the code against the stored secret
        if !otp::verify(&user.otp_secret, code) {
            tracing::warn!(
                user_id = %user.id,
                event = "otp_rejected",
                "Verification code rejected"
            );
            return Err(AccountError::InvalidOtp.into());
        }

        // 3. Persist only the unverified -> verified transition
        if !user.is_verified {
            user.verify();
            user = self.user_repository.update(user).await?;
            tracing::info!(
                user_id = %user.id,
                event = "email_verified",
                "Email verified"
            );
        }

        Ok(user)
    }

    /// Authenticates by email and password, returning tokens plus the
    /// public user projection.
    ///
    /// Unknown email, wrong password and deactivated account all collapse
    /// to [`AccountError::InvalidCredentials`] so responses never reveal
    /// which accounts exist. Only the unverified state is reported
    /// distinctly.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        // 1. Look up by normalized email
        let email = normalize_email(email);
        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Burn a hash so unknown emails cost the same as bad passwords
                let _ = self.password_hasher.hash(password);
                return Err(AccountError::InvalidCredentials.into());
            }
        };

        // 2. Check the password
        let password_ok = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification failed: {}", e),
            })?;
        if !password_ok {
            tracing::warn!(
                user_id = %user.id,
                event = "login_rejected",
                "Login rejected: wrong password"
            );
            return Err(AccountError::InvalidCredentials.into());
        }

        // 3. Deactivated accounts look identical to bad credentials
        if !user.is_active {
            tracing::warn!(
                user_id = %user.id,
                event = "login_rejected",
                "Login rejected: account deactivated"
            );
            return Err(AccountError::InvalidCredentials.into());
        }

        // 4. The verification gate is the one distinct failure
        if !user.is_verified {
            return Err(AccountError::EmailNotVerified.into());
        }

        // 5. Issue tokens and assemble the public projection
        let tokens = self.token_service.issue(&user)?;
        let profile = self
            .user_repository
            .find_profile_by_user_id(user.id)
            .await?;
        let view = UserView::from_parts(&user, profile.as_ref());

        tracing::info!(
            user_id = %user.id,
            event = "user_logged_in",
            "Login succeeded"
        );

        Ok(AuthResponse::from_token_pair(tokens, view))
    }

    /// Revokes a refresh token.
    ///
    /// Every revocation failure collapses to
    /// [`TokenError::InvalidRefreshToken`]; the root cause is logged but
    /// never returned to the caller.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        if let Err(e) = self.token_service.revoke_refresh_token(refresh_token).await {
            tracing::warn!(
                error = %e,
                event = "logout_rejected",
                "Refresh token revocation failed"
            );
            return Err(TokenError::InvalidRefreshToken.into());
        }

        tracing::info!(event = "user_logged_out", "Refresh token revoked");
        Ok(())
    }

    /// Returns the public projection of an authenticated user.
    pub async fn whoami(&self, user_id: Uuid) -> DomainResult<UserView> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;
        let profile = self
            .user_repository
            .find_profile_by_user_id(user_id)
            .await?;
        Ok(UserView::from_parts(&user, profile.as_ref()))
    }

    /// Computes the current code for `user` and emails it.
    ///
    /// Failures are logged and swallowed: the account state is already
    /// committed by the time delivery runs.
    async fn send_verification_email(&self, user: &User) {
        let code = match otp::generate(&user.otp_secret) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    error = %e,
                    event = "otp_generation_failed",
                    "Could not derive a verification code"
                );
                return;
            }
        };

        let body = format!(
            "Your OTP code is: {}. It will expire in 10 minutes.",
            code
        );
        match self
            .email_service
            .send_email(&user.email, "Verify your account", &body)
            .await
        {
            Ok(message_id) => {
                tracing::debug!(
                    user_id = %user.id,
                    message_id = %message_id,
                    event = "otp_dispatched",
                    "Verification code sent"
                );
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    error = %e,
                    event = "otp_delivery_failed",
                    "Verification email could not be delivered"
                );
            }
        }
    }
}
