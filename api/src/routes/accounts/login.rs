use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use validator::Validate;

use crate::dto::accounts::LoginRequest;
use crate::dto::error::ErrorResponse;
use crate::handlers::error::handle_domain_error;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

use super::AppState;

/// Handler for POST /api/v1/accounts/login
///
/// Authenticates with email and password, returning a token pair and the
/// public user projection. Unknown email, wrong password and deactivated
/// accounts all produce the same 401; only the unverified state is
/// reported distinctly.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@campus.edu", "password": "s3cret!pass" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJhbGciOiJIUzI1NiIs...",
///     "refresh_token": "eyJhbGciOiJIUzI1NiIs...",
///     "expires_in": 900,
///     "user": { "id": "...", "username": "alice", "email": "...", "is_verified": true }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed request data
/// - 401 Unauthorized: invalid credentials
/// - 403 Forbidden: email not verified
pub async fn login<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    request: web::Json<LoginRequest>,
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
        .login(&request.email, &request.password)
        .await
    {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(error) => handle_domain_error(error),
    }
}
