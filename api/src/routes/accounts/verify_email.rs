use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::dto::accounts::{MessageResponse, VerifyEmailRequest};
use crate::dto::error::ErrorResponse;
use crate::handlers::error::handle_domain_error;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

use super::AppState;

/// Handler for POST /api/v1/accounts/verify-email
///
/// Confirms ownership of the registered email address with the OTP code
/// that was delivered to it. A correct code against an already verified
/// account succeeds and changes nothing.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@campus.edu", "otp": "123456" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "detail": "Email verified successfully" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed request or wrong/expired OTP
/// - 404 Not Found: no account under that email
pub async fn verify_email<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    request: web::Json<VerifyEmailRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    E: EmailServiceTrait + 'static,
    P: PasswordHasherTrait + 'static,
{
    // Validate request data
    if let Err(errors) = request.validate() {
        let mut details = HashMap::new();
        details.insert("validation_errors".to_string(), serde_json::json!(errors));

        return HttpResponse::BadRequest().json(
            ErrorResponse::new("validation_error", "Invalid request data").with_details(details),
        );
    }

    match state
        .account_service
        .verify_email(&request.email, &request.otp)
        .await
    {
        Ok(_user) => HttpResponse::Ok().json(MessageResponse::new("Email verified successfully")),
        Err(error) => handle_domain_error(error),
    }
}
