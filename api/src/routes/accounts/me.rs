use actix_web::{web, HttpResponse};

use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

use super::AppState;

/// Handler for GET /api/v1/accounts/me
///
/// Returns the public projection of the authenticated user, including
/// their profile when one exists.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "username": "alice",
///     "email": "alice@campus.edu",
///     "is_verified": true,
///     "profile": { "phone_number": "+12025550123", "role": "student" }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or invalid access token
/// - 404 Not Found: the account behind the token no longer exists
pub async fn me<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    E: EmailServiceTrait + 'static,
    P: PasswordHasherTrait + 'static,
{
    match state.account_service.whoami(auth.user_id).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(error) => handle_domain_error(error),
    }
}
