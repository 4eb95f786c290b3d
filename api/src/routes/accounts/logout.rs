use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::dto::accounts::{LogoutRequest, MessageResponse};
use crate::dto::error::ErrorResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

use super::AppState;

/// Handler for POST /api/v1/accounts/logout
///
/// Revokes the submitted refresh token. Requires authentication via a
/// Bearer access token; the access token itself stays valid until its
/// natural expiry.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Request Body
///
/// ```json
/// { "refresh": "eyJhbGciOiJIUzI1NiIs..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "detail": "Logged out successfully" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid, expired or already revoked refresh token
/// - 401 Unauthorized: missing or invalid access token
pub async fn logout<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    auth: AuthContext,
    request: web::Json<LogoutRequest>,
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

    match state.account_service.logout(&request.refresh).await {
        Ok(()) => {
            log::info!("User {} logged out", auth.user_id);
            HttpResponse::Ok().json(MessageResponse::new("Logged out successfully"))
        }
        Err(error) => handle_domain_error(error),
    }
}
