//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT issuer
pub const JWT_ISSUER: &str = "campusmart";

/// JWT audience
pub const JWT_AUDIENCE: &str = "campusmart-api";

/// Kind of token a set of claims belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer credential, stateless until natural expiry
    Access,
    /// Longer-lived credential, revocable through the jti blacklist
    Refresh,
}

impl TokenType {
    /// Returns the lowercase wire form of the token type
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Whether the claims describe an access or a refresh token
    pub token_type: TokenType,

    /// Whether the user's email is verified
    pub is_verified: bool,
}

impl Claims {
    /// Creates new claims with an explicit lifetime
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `token_type` - Access or refresh
    /// * `is_verified` - Whether the user's email is verified
    /// * `lifetime` - Validity period from now
    ///
    /// # Returns
    ///
    /// A new `Claims` instance with a fresh jti
    pub fn with_lifetime(
        user_id: Uuid,
        token_type: TokenType,
        is_verified: bool,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            is_verified,
        }
    }

    /// Creates new claims for an access token with the default lifetime
    pub fn new_access_token(user_id: Uuid, is_verified: bool) -> Self {
        Self::with_lifetime(
            user_id,
            TokenType::Access,
            is_verified,
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
        )
    }

    /// Creates new claims for a refresh token with the default lifetime
    pub fn new_refresh_token(user_id: Uuid, is_verified: bool) -> Self {
        Self::with_lifetime(
            user_id,
            TokenType::Refresh,
            is_verified,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
        )
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks if the claims are valid (not expired and after nbf)
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Gets the expiry as a UTC timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
    }
}

/// Blacklist entry for a revoked refresh token
///
/// Only the jti is stored, never the token value. The entry carries the
/// token's natural expiry so the blacklist can be purged once the token
/// would have died anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    /// JWT ID of the revoked token
    pub jti: String,

    /// User the token belonged to
    pub user_id: Uuid,

    /// Timestamp when the token was revoked
    pub revoked_at: DateTime<Utc>,

    /// Natural expiry of the revoked token
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Creates a new blacklist entry
    pub fn new(jti: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            jti,
            user_id,
            revoked_at: Utc::now(),
            expires_at,
        }
    }

    /// Checks if the underlying token has passed its natural expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the default expiry times
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self::with_expiries(
            access_token,
            refresh_token,
            ACCESS_TOKEN_EXPIRY_MINUTES * 60,
            REFRESH_TOKEN_EXPIRY_DAYS * 24 * 60 * 60,
        )
    }

    /// Creates a new token pair with explicit expiry times in seconds
    pub fn with_expiries(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(user_id, true);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.is_verified);
        assert!(claims.is_valid());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_refresh_token(user_id, false);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(!claims.is_verified);
        assert!(claims.is_valid());
        assert!(claims.exp - claims.iat >= REFRESH_TOKEN_EXPIRY_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_distinct_jti_per_token() {
        let user_id = Uuid::new_v4();
        let first = Claims::new_access_token(user_id, true);
        let second = Claims::new_access_token(user_id, true);

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_claims_user_id_parsing() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(user_id, false);

        let parsed_id = claims.user_id().unwrap();
        assert_eq!(parsed_id, user_id);
    }

    #[test]
    fn test_claims_expiration() {
        let user_id = Uuid::new_v4();
        let mut claims = Claims::new_access_token(user_id, false);

        // Set expiration to past
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
        assert!(!claims.is_valid());
    }

    #[test]
    fn test_claims_not_before() {
        let user_id = Uuid::new_v4();
        let mut claims = Claims::new_access_token(user_id, false);

        // Set nbf to future
        claims.nbf = Utc::now().timestamp() + 3600;

        assert!(!claims.is_valid());
    }

    #[test]
    fn test_revoked_token_expiry() {
        let user_id = Uuid::new_v4();
        let live = RevokedToken::new(
            Uuid::new_v4().to_string(),
            user_id,
            Utc::now() + Duration::days(7),
        );
        assert!(!live.is_expired());

        let dead = RevokedToken::new(
            Uuid::new_v4().to_string(),
            user_id,
            Utc::now() - Duration::days(1),
        );
        assert!(dead.is_expired());
    }

    #[test]
    fn test_token_pair_creation() {
        let access = "access_token_jwt".to_string();
        let refresh = "refresh_token_jwt".to_string();
        let pair = TokenPair::new(access.clone(), refresh.clone());

        assert_eq!(pair.access_token, access);
        assert_eq!(pair.refresh_token, refresh);
        assert_eq!(pair.access_expires_in, ACCESS_TOKEN_EXPIRY_MINUTES * 60);
        assert_eq!(pair.refresh_expires_in, REFRESH_TOKEN_EXPIRY_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_claims_serialization() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new_access_token(user_id, true);

        // Serialize to JSON
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_type\":\"access\""));

        // Deserialize back
        let deserialized: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair::new("access_token".to_string(), "refresh_token".to_string());

        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: TokenPair = serde_json::from_str(&json).unwrap();

        assert_eq!(pair, deserialized);
    }
}
