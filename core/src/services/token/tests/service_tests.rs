//! Unit tests for token service

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{RevokedToken, TokenType};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::token::{MockTokenBlacklistRepository, TokenBlacklistRepository};
use crate::services::token::{TokenService, TokenServiceConfig};

fn test_user() -> User {
    let mut user = User::new(
        "alice@campus.edu".to_string(),
        "alice".to_string(),
        "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP".to_string(),
    );
    user.verify();
    user
}

fn service_with(
    config: TokenServiceConfig,
) -> (
    TokenService<MockTokenBlacklistRepository>,
    Arc<MockTokenBlacklistRepository>,
) {
    let repository = Arc::new(MockTokenBlacklistRepository::new());
    (TokenService::new(repository.clone(), config), repository)
}

fn test_service() -> (
    TokenService<MockTokenBlacklistRepository>,
    Arc<MockTokenBlacklistRepository>,
) {
    service_with(TokenServiceConfig::with_secret("unit-test-secret"))
}

#[tokio::test]
async fn test_issue_produces_valid_pair() {
    let (service, _) = test_service();
    let user = test_user();

    let pair = service.issue(&user).unwrap();

    assert_eq!(pair.access_expires_in, 15 * 60);
    assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);

    let claims = service.validate_access_token(&pair.access_token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.token_type, TokenType::Access);
    assert!(claims.is_verified);
}

#[tokio::test]
async fn test_issued_tokens_have_distinct_jtis() {
    let (service, _) = test_service();
    let user = test_user();

    let first = service.issue(&user).unwrap();
    let second = service.issue(&user).unwrap();

    let first_claims = service.validate_access_token(&first.access_token).unwrap();
    let second_claims = service.validate_access_token(&second.access_token).unwrap();

    assert_ne!(first_claims.jti, second_claims.jti);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access() {
    let (service, _) = test_service();
    let pair = service.issue(&test_user()).unwrap();

    let result = service.validate_access_token(&pair.refresh_token);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidClaims)
    ));
}

#[tokio::test]
async fn test_validate_rejects_foreign_signature() {
    let (issuing_service, _) = test_service();
    let (validating_service, _) =
        service_with(TokenServiceConfig::with_secret("a-different-secret"));

    let pair = issuing_service.issue(&test_user()).unwrap();
    let result = validating_service.validate_access_token(&pair.access_token);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidSignature)
    ));
}

#[tokio::test]
async fn test_validate_rejects_expired_token() {
    // Expiry far enough in the past to clear the default decode leeway
    let config = TokenServiceConfig {
        access_token_expiry_minutes: -2,
        ..TokenServiceConfig::with_secret("unit-test-secret")
    };
    let (service, _) = service_with(config);

    let pair = service.issue(&test_user()).unwrap();
    let result = service.validate_access_token(&pair.access_token);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_validate_rejects_garbage() {
    let (service, _) = test_service();

    let result = service.validate_access_token("definitely.not.a-jwt");

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[tokio::test]
async fn test_revoke_refresh_token_blacklists_jti() {
    let (service, repository) = test_service();
    let pair = service.issue(&test_user()).unwrap();

    service.revoke_refresh_token(&pair.refresh_token).await.unwrap();

    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_second_revoke_fails() {
    let (service, _) = test_service();
    let pair = service.issue(&test_user()).unwrap();

    service.revoke_refresh_token(&pair.refresh_token).await.unwrap();
    let result = service.revoke_refresh_token(&pair.refresh_token).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::TokenRevoked)
    ));
}

#[tokio::test]
async fn test_revoke_rejects_access_token() {
    let (service, repository) = test_service();
    let pair = service.issue(&test_user()).unwrap();

    let result = service.revoke_refresh_token(&pair.access_token).await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidClaims)
    ));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_revoke_rejects_garbage() {
    let (service, _) = test_service();

    let result = service.revoke_refresh_token("not-a-token").await;

    assert!(matches!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[tokio::test]
async fn test_access_token_ignores_blacklist() {
    // Revoking the refresh token leaves the access token alive; access
    // tokens are stateless until natural expiry.
    let (service, repository) = test_service();
    let pair = service.issue(&test_user()).unwrap();

    service.revoke_refresh_token(&pair.refresh_token).await.unwrap();
    assert!(service.validate_access_token(&pair.access_token).is_ok());

    // Even a blacklisted access jti is not consulted during validation
    let claims = service.validate_access_token(&pair.access_token).unwrap();
    repository
        .insert(RevokedToken::new(
            claims.jti.clone(),
            Uuid::new_v4(),
            Utc::now() + Duration::days(1),
        ))
        .await
        .unwrap();
    assert!(service.validate_access_token(&pair.access_token).is_ok());
}

#[tokio::test]
async fn test_purge_expired_clears_dead_entries() {
    let (service, repository) = test_service();

    repository
        .insert(RevokedToken::new(
            Uuid::new_v4().to_string(),
            Uuid::new_v4(),
            Utc::now() - Duration::hours(1),
        ))
        .await
        .unwrap();
    repository
        .insert(RevokedToken::new(
            Uuid::new_v4().to_string(),
            Uuid::new_v4(),
            Utc::now() + Duration::hours(1),
        ))
        .await
        .unwrap();

    let purged = service.purge_expired().await.unwrap();

    assert_eq!(purged, 1);
    assert_eq!(repository.len().await, 1);
}
