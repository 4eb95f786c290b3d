//! Domain error to HTTP response mapping.

use crate::dto::error::{ErrorResponse, ErrorResponseExt};
use actix_web::{http::StatusCode, HttpResponse};
use cm_core::errors::{AccountError, DomainError, TokenError};
use serde_json::json;

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    log::error!("Domain error: {:?}", error);

    match error {
        DomainError::Account(account_error) => handle_account_error(account_error),
        DomainError::Token(token_error) => handle_token_error(token_error),
        DomainError::Fields(errors) => {
            let details = errors
                .to_field_errors()
                .into_iter()
                .map(|(field, messages)| (field, json!(messages)))
                .collect();

            ErrorResponse::new("validation_error", "Invalid request data")
                .with_details(details)
                .to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::Validation { message } => {
            ErrorResponse::new("validation_error", message).to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::NotFound { resource } => {
            ErrorResponse::new("not_found", format!("{} not found", resource))
                .to_response(StatusCode::NOT_FOUND)
        }
        DomainError::Internal { .. } => {
            // The cause is already in the log line above; the client gets
            // a generic body with nothing leaked.
            ErrorResponse::new("internal_error", "An internal server error occurred")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn handle_account_error(error: AccountError) -> HttpResponse {
    match error {
        AccountError::EmailAlreadyRegistered => {
            ErrorResponse::new("email_already_registered", "Email already registered")
                .to_response(StatusCode::CONFLICT)
        }
        AccountError::PhoneAlreadyRegistered => {
            ErrorResponse::new("phone_already_registered", "Phone number already registered")
                .to_response(StatusCode::CONFLICT)
        }
        AccountError::UserNotFound => ErrorResponse::new("user_not_found", "User not found")
            .to_response(StatusCode::NOT_FOUND),
        AccountError::UserAlreadyVerified => {
            ErrorResponse::new("user_already_verified", "User already verified")
                .to_response(StatusCode::BAD_REQUEST)
        }
        AccountError::InvalidOtp => ErrorResponse::new("invalid_otp", "Invalid or expired OTP")
            .to_response(StatusCode::BAD_REQUEST),
        AccountError::InvalidCredentials => {
            ErrorResponse::new("invalid_credentials", "Invalid credentials")
                .to_response(StatusCode::UNAUTHORIZED)
        }
        AccountError::EmailNotVerified => {
            ErrorResponse::new("email_not_verified", "Email not verified")
                .to_response(StatusCode::FORBIDDEN)
        }
    }
}

fn handle_token_error(error: TokenError) -> HttpResponse {
    match error {
        // Logout surfaces every revocation failure as this one error
        TokenError::InvalidRefreshToken => ErrorResponse::new("invalid_token", "Invalid token")
            .to_response(StatusCode::BAD_REQUEST),
        TokenError::TokenGenerationFailed => {
            ErrorResponse::new("token_generation_failed", "Failed to generate token")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
        TokenError::TokenExpired => ErrorResponse::new("token_expired", "Token has expired")
            .to_response(StatusCode::UNAUTHORIZED),
        TokenError::InvalidTokenFormat => {
            ErrorResponse::new("invalid_token_format", "Invalid token format")
                .to_response(StatusCode::UNAUTHORIZED)
        }
        TokenError::InvalidSignature => {
            ErrorResponse::new("invalid_signature", "Invalid token signature")
                .to_response(StatusCode::UNAUTHORIZED)
        }
        TokenError::TokenNotYetValid => {
            ErrorResponse::new("token_not_yet_valid", "Token is not yet valid")
                .to_response(StatusCode::UNAUTHORIZED)
        }
        TokenError::InvalidClaims => ErrorResponse::new("invalid_claims", "Invalid token claims")
            .to_response(StatusCode::UNAUTHORIZED),
        TokenError::TokenRevoked => ErrorResponse::new("token_revoked", "Token has been revoked")
            .to_response(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_shared::validation::ValidationErrors;

    #[test]
    fn test_conflict_errors_map_to_409() {
        let response = handle_domain_error(AccountError::EmailAlreadyRegistered.into());
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = handle_domain_error(AccountError::PhoneAlreadyRegistered.into());
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let response = handle_domain_error(AccountError::InvalidCredentials.into());
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unverified_login_maps_to_403() {
        let response = handle_domain_error(AccountError::EmailNotVerified.into());
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_refresh_token_maps_to_400() {
        let response = handle_domain_error(TokenError::InvalidRefreshToken.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_field_errors_map_to_400() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", "Enter a valid email address.", "invalid");

        let response = handle_domain_error(DomainError::Fields(errors));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_is_opaque_500() {
        let response = handle_domain_error(DomainError::Internal {
            message: "connection pool exhausted".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
