//! Integration tests for the login endpoint

use std::sync::Arc;

use actix_web::{test, web};
use serde_json::json;

use cm_api::app::create_app;
use cm_api::middleware::auth::JwtAuth;
use cm_api::middleware::rate_limit::RateLimits;
use cm_api::routes::accounts::AppState;
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

/// Seeds a registered account through the service layer
async fn seed_account(state: &web::Data<TestState>, email: &str, verified: bool) {
    state
        .account_service
        .register(RegistrationData {
            username: "amina".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            phone_number: "+15551234567".to_string(),
            role: "student".to_string(),
            date_of_birth: None,
        })
        .await
        .unwrap();

    if verified {
        let code = otp::generate(&fixed_otp_secret()).unwrap();
        state
            .account_service
            .verify_email(email, &code)
            .await
            .unwrap();
    }
}

#[actix_web::test]
async fn test_login_success() {
    let state = test_state();
    seed_account(&state, "amina@campus.edu", true).await;

    let app =
        test::init_service(create_app(state.clone(), test_jwt(), RateLimits::disabled())).await;

    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "amina@campus.edu", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["email"], "amina@campus.edu");
    assert_eq!(body["user"]["is_verified"], true);
    assert_eq!(body["user"]["profile"]["role"], "student");
}

#[actix_web::test]
async fn test_login_is_case_insensitive_on_email() {
    let state = test_state();
    seed_account(&state, "amina@campus.edu", true).await;

    let app =
        test::init_service(create_app(state.clone(), test_jwt(), RateLimits::disabled())).await;

    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "Amina@Campus.EDU", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_login_unverified_account() {
    let state = test_state();
    seed_account(&state, "amina@campus.edu", false).await;

    let app =
        test::init_service(create_app(state.clone(), test_jwt(), RateLimits::disabled())).await;

    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "amina@campus.edu", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 403);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "email_not_verified");
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let state = test_state();
    seed_account(&state, "amina@campus.edu", true).await;

    let app =
        test::init_service(create_app(state.clone(), test_jwt(), RateLimits::disabled())).await;

    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "amina@campus.edu", "password": "WrongPass!" }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_credentials");
}

#[actix_web::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = test::init_service(create_app(test_state(), test_jwt(), RateLimits::disabled())).await;

    // Same status and code as a bad password; account existence stays hidden
    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "nobody@campus.edu", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 401);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_credentials");
}

#[actix_web::test]
async fn test_login_rejects_malformed_email() {
    let app = test::init_service(create_app(test_state(), test_jwt(), RateLimits::disabled())).await;

    let login = test::TestRequest::post()
        .uri("/api/v1/accounts/login")
        .set_json(json!({ "email": "not-an-email", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}
