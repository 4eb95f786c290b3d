//! Main token service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RevokedToken, TokenPair, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenBlacklistRepository;

use super::config::TokenServiceConfig;

/// Service for issuing, validating, and revoking JWT tokens
///
/// Access tokens are stateless: once issued they stay valid until natural
/// expiry. Refresh tokens are individually revocable through the jti
/// blacklist.
pub struct TokenService<B: TokenBlacklistRepository> {
    repository: Arc<B>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<B: TokenBlacklistRepository> TokenService<B> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Blacklist repository for revocation state
    /// * `config` - Token service configuration (HS256 symmetric key)
    pub fn new(repository: Arc<B>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issues a fresh access/refresh token pair for a user
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Signed tokens with their expiry times
    /// * `Err(DomainError)` - Signing failed
    pub fn issue(&self, user: &User) -> DomainResult<TokenPair> {
        let access_claims = self.build_claims(
            user.id,
            TokenType::Access,
            user.is_verified,
            Duration::minutes(self.config.access_token_expiry_minutes),
        );
        let refresh_claims = self.build_claims(
            user.id,
            TokenType::Refresh,
            user.is_verified,
            Duration::days(self.config.refresh_token_expiry_days),
        );

        let access_token = self.encode_jwt(&access_claims)?;
        let refresh_token = self.encode_jwt(&refresh_claims)?;

        tracing::debug!(
            user_id = %user.id,
            access_jti = %access_claims.jti,
            refresh_jti = %refresh_claims.jti,
            event = "tokens_issued",
            "Issued access/refresh token pair"
        );

        Ok(TokenPair::with_expiries(
            access_token,
            refresh_token,
            self.config.access_token_expiry_minutes * 60,
            self.config.refresh_token_expiry_days * 24 * 60 * 60,
        ))
    }

    /// Validates an access token and returns its claims
    ///
    /// Checks signature, expiry, nbf, issuer, and audience, and requires the
    /// token to actually be an access token. The blacklist is deliberately
    /// not consulted; access tokens die only by expiry.
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT access token to validate
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - Token is invalid, expired, or of the wrong type
    pub fn validate_access_token(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode_jwt(token)?;

        if claims.token_type != TokenType::Access {
            return Err(DomainError::Token(TokenError::InvalidClaims));
        }

        Ok(claims)
    }

    /// Revokes a refresh token by blacklisting its jti
    ///
    /// The token must decode and validate fully and must be a refresh token.
    /// Revocation is not idempotent: revoking a jti that is already on the
    /// blacklist fails with `TokenError::TokenRevoked`.
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT refresh token to revoke
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Token revoked
    /// * `Err(DomainError)` - Token invalid, of the wrong type, or already revoked
    pub async fn revoke_refresh_token(&self, token: &str) -> DomainResult<()> {
        let claims = self.decode_jwt(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(DomainError::Token(TokenError::InvalidClaims));
        }

        let user_id: Uuid = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;
        let expires_at = claims.expires_at().ok_or_else(|| DomainError::Internal {
            message: "Refresh token carries an unrepresentable expiry".to_string(),
        })?;

        if self.repository.contains(&claims.jti).await? {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        self.repository
            .insert(RevokedToken::new(claims.jti.clone(), user_id, expires_at))
            .await?;

        tracing::info!(
            user_id = %user_id,
            jti = %claims.jti,
            event = "refresh_token_revoked",
            "Refresh token revoked"
        );

        Ok(())
    }

    /// Removes blacklist entries whose tokens have expired naturally
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of entries purged
    /// * `Err(DomainError)` - Purge failed
    pub async fn purge_expired(&self) -> DomainResult<u64> {
        let purged = self.repository.purge_expired(Utc::now()).await?;

        if purged > 0 {
            tracing::info!(
                purged = purged,
                event = "blacklist_purged",
                "Removed expired blacklist entries"
            );
        }

        Ok(purged)
    }

    /// Builds claims stamped with the configured issuer and audience
    fn build_claims(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        is_verified: bool,
        lifetime: Duration,
    ) -> Claims {
        let mut claims = Claims::with_lifetime(user_id, token_type, is_verified, lifetime);
        claims.iss = self.config.issuer.clone();
        claims.aud = self.config.audience.clone();
        claims
    }

    /// Encodes claims into a JWT
    fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Decodes and fully validates a JWT, mapping library errors to the
    /// domain taxonomy
    fn decode_jwt(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;
        Ok(token_data.claims)
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> DomainError {
    use jsonwebtoken::errors::ErrorKind;

    let token_error = match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => TokenError::InvalidClaims,
        _ => TokenError::InvalidTokenFormat,
    };

    DomainError::Token(token_error)
}
