//! Integration tests for the me endpoint

use std::sync::Arc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web, HttpResponse};

use cm_api::app::create_app;
use cm_api::middleware::auth::JwtAuth;
use cm_api::middleware::rate_limit::RateLimits;
use cm_api::routes::accounts::AppState;
use cm_core::domain::value_objects::AuthResponse;
use cm_core::repositories::{MockTokenBlacklistRepository, MockUserRepository};
use cm_core::services::account::{AccountService, RegistrationData};
use cm_core::services::otp;
use cm_core::services::token::{TokenService, TokenServiceConfig};
use cm_infra::email::ConsoleEmailService;
use cm_infra::services::BcryptPasswordHasher;
use cm_shared::config::JwtConfig;

const TEST_SECRET: &str = "integration-test-secret";
const PASSWORD: &str = "S3curePass!";

type TestState = AppState<
    MockUserRepository,
    MockTokenBlacklistRepository,
    ConsoleEmailService,
    BcryptPasswordHasher,
>;

/// Pinned OTP secret so tests can compute the code the service expects
fn fixed_otp_secret() -> String {
    "JBSWY3DPEHPK3PXP".to_string()
}

fn test_state() -> web::Data<TestState> {
    let user_repo = Arc::new(MockUserRepository::new());
    let token_repo = Arc::new(MockTokenBlacklistRepository::new());

    let token_service = Arc::new(TokenService::new(
        token_repo,
        TokenServiceConfig::with_secret(TEST_SECRET),
    ));
    let email_service = Arc::new(ConsoleEmailService::with_options(false, false));
    let password_hasher = Arc::new(BcryptPasswordHasher::with_cost(4));

    let account_service = Arc::new(AccountService::new(
        user_repo,
        token_service,
        email_service,
        password_hasher,
        fixed_otp_secret,
    ));

    web::Data::new(AppState { account_service })
}

fn test_jwt() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(TEST_SECRET))
}

/// Calls the app like [`test::call_service`], but renders service-level
/// errors (middleware rejections) into the HTTP responses a real server
/// would send instead of panicking.
async fn call_rendering_errors<S, R, B>(app: &S, req: R) -> ServiceResponse<BoxBody>
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody + 'static,
{
    match app.call(req).await {
        Ok(res) => res.map_into_boxed_body(),
        Err(err) => ServiceResponse::new(
            test::TestRequest::default().to_http_request(),
            HttpResponse::from_error(err),
        ),
    }
}

/// Registers, verifies, and logs in an account, returning its tokens
async fn seed_session(state: &web::Data<TestState>, email: &str) -> AuthResponse {
    state
        .account_service
        .register(RegistrationData {
            username: "amina".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            phone_number: "+15551234567".to_string(),
            role: "vendor".to_string(),
            date_of_birth: None,
        })
        .await
        .unwrap();

    let code = otp::generate(&fixed_otp_secret()).unwrap();
    state
        .account_service
        .verify_email(email, &code)
        .await
        .unwrap();

    state.account_service.login(email, PASSWORD).await.unwrap()
}

#[actix_web::test]
async fn test_me_success() {
    let state = test_state();
    let session = seed_session(&state, "amina@campus.edu").await;

    let app =
        test::init_service(create_app(state.clone(), test_jwt(), RateLimits::disabled())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/accounts/me")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", session.access_token),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "amina");
    assert_eq!(body["email"], "amina@campus.edu");
    assert_eq!(body["is_verified"], true);
    assert_eq!(body["profile"]["phone_number"], "+15551234567");
    assert_eq!(body["profile"]["role"], "vendor");
    assert!(body["id"].as_str().is_some());
}

#[actix_web::test]
async fn test_me_without_auth() {
    let app = test::init_service(create_app(test_state(), test_jwt(), RateLimits::disabled())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/accounts/me")
        .to_request();
    let resp = call_rendering_errors(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_me_with_garbage_token() {
    let app = test::init_service(create_app(test_state(), test_jwt(), RateLimits::disabled())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/accounts/me")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = call_rendering_errors(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_me_with_wrong_signing_key() {
    let state = test_state();
    let session = seed_session(&state, "amina@campus.edu").await;

    // Middleware configured with a different secret than the issuer
    let foreign_jwt = JwtAuth::new(&JwtConfig::new("some-other-secret"));
    let app =
        test::init_service(create_app(state.clone(), foreign_jwt, RateLimits::disabled())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/accounts/me")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", session.access_token),
        ))
        .to_request();
    let resp = call_rendering_errors(&app, req).await;
    assert_eq!(resp.status(), 401);
}
