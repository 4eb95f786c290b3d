use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::dto::accounts::{MessageResponse, ResendOtpRequest};
use crate::dto::error::ErrorResponse;
use crate::handlers::error::handle_domain_error;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

use super::AppState;

/// Handler for POST /api/v1/accounts/resend-otp
///
/// Re-sends the verification code to a pending account. The code is
/// recomputed from the stored secret, so an earlier delivery of the same
/// window stays valid.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@campus.edu" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "detail": "OTP resent successfully" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed request or account already verified
/// - 404 Not Found: no account under that email
pub async fn resend_otp<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    request: web::Json<ResendOtpRequest>,
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

    match state.account_service.resend_otp(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("OTP resent successfully")),
        Err(error) => handle_domain_error(error),
    }
}
