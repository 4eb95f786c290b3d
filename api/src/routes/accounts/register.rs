use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::dto::accounts::{MessageResponse, RegisterRequest};
use crate::dto::error::ErrorResponse;
use crate::handlers::error::handle_domain_error;

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{
    AccountService, EmailServiceTrait, PasswordHasherTrait, RegistrationData,
};

/// Application state that holds shared services
pub struct AppState<U, B, E, P>
where
    U: UserRepository,
    B: TokenBlacklistRepository,
    E: EmailServiceTrait,
    P: PasswordHasherTrait,
{
    pub account_service: Arc<AccountService<U, B, E, P>>,
}

/// Handler for POST /api/v1/accounts/register
///
/// Creates an unverified account and emails its first OTP code.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice",
///     "email": "alice@campus.edu",
///     "password": "s3cret!pass",
///     "profile": {
///         "phone_number": "+12025550123",
///         "role": "student",
///         "date_of_birth": "2002-04-17"
///     }
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "detail": "Registered. OTP sent to email." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid request data (per-field error map)
/// - 409 Conflict: email or phone number already registered
/// - 500 Internal Server Error: database failure
pub async fn register<U, B, E, P>(
    state: web::Data<AppState<U, B, E, P>>,
    request: web::Json<RegisterRequest>,
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

    let data = registration_data(&request);

    match state.account_service.register(data).await {
        Ok(_user) => {
            HttpResponse::Created().json(MessageResponse::new("Registered. OTP sent to email."))
        }
        Err(error) => handle_domain_error(error),
    }
}

fn registration_data(request: &RegisterRequest) -> RegistrationData {
    RegistrationData {
        username: request.username.clone(),
        email: request.email.clone(),
        password: request.password.clone(),
        phone_number: request.profile.phone_number.clone(),
        role: request.profile.role.clone(),
        date_of_birth: request.profile.date_of_birth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::accounts::ProfileDto;
    use chrono::NaiveDate;

    #[test]
    fn test_registration_data_mapping() {
        let request = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@campus.edu".to_string(),
            password: "s3cret!pass".to_string(),
            profile: ProfileDto {
                phone_number: "+12025550123".to_string(),
                role: "student".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2002, 4, 17),
            },
        };

        let data = registration_data(&request);
        assert_eq!(data.username, "alice");
        assert_eq!(data.email, "alice@campus.edu");
        assert_eq!(data.phone_number, "+12025550123");
        assert_eq!(data.role, "student");
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(2002, 4, 17));
    }
}
