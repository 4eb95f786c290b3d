//! Application factory
//!
//! Assembles the Actix-web application: middleware stack, account routes,
//! health check, and the fallback handler. Kept separate from `main` so
//! integration tests can build the exact app the binary serves.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};

use crate::middleware::{
    auth::JwtAuth, cors::create_cors, rate_limit::RateLimits, security::SecurityMiddleware,
};
use crate::routes::accounts::{
    login::login, logout::logout, me::me, register::register, resend_otp::resend_otp,
    verify_email::verify_email, AppState,
};

use cm_core::repositories::{TokenBlacklistRepository, UserRepository};
use cm_core::services::account::{EmailServiceTrait, PasswordHasherTrait};

/// Create and configure the application with all dependencies
pub fn create_app<U, B, E, P>(
    app_state: web::Data<AppState<U, B, E, P>>,
    jwt: JwtAuth,
    limits: RateLimits,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    B: TokenBlacklistRepository + 'static,
    E: EmailServiceTrait + 'static,
    P: PasswordHasherTrait + 'static,
{
    // Configure CORS using our custom middleware
    let cors = create_cors();

    // Configure security middleware
    let security = SecurityMiddleware::new();

    App::new()
        // Add application state
        .app_data(app_state)
        // Add middleware (order matters: security first, then CORS, then logging)
        .wrap(Logger::default())
        .wrap(cors)
        .wrap(security)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                // Account routes
                .service(
                    web::scope("/accounts")
                        .route(
                            "/register",
                            web::post().to(register::<U, B, E, P>).wrap(limits.register),
                        )
                        .route(
                            "/verify-email",
                            web::post()
                                .to(verify_email::<U, B, E, P>)
                                .wrap(limits.verify_email),
                        )
                        .route(
                            "/resend-otp",
                            web::post()
                                .to(resend_otp::<U, B, E, P>)
                                .wrap(limits.resend_otp),
                        )
                        .route(
                            "/login",
                            web::post().to(login::<U, B, E, P>).wrap(limits.login),
                        )
                        .route(
                            "/logout",
                            web::post().to(logout::<U, B, E, P>).wrap(jwt.clone()),
                        )
                        .route("/me", web::get().to(me::<U, B, E, P>).wrap(jwt)),
                )
                // API documentation endpoint
                .route("/", web::get().to(api_documentation)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "campusmart-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "CampusMart API v1",
        "endpoints": {
            "health": "/health",
            "accounts": {
                "register": {
                    "path": "/api/v1/accounts/register",
                    "method": "POST",
                    "description": "Register a new account and send an OTP to its email",
                    "request_body": {
                        "username": "string",
                        "email": "string",
                        "password": "string",
                        "profile": {
                            "phone_number": "string",
                            "role": "student | vendor | admin",
                            "date_of_birth": "YYYY-MM-DD (optional)"
                        }
                    },
                    "responses": {
                        "201": "Registered, OTP sent",
                        "400": "Invalid request data",
                        "409": "Email or phone already registered"
                    }
                },
                "verify_email": {
                    "path": "/api/v1/accounts/verify-email",
                    "method": "POST",
                    "description": "Verify an email address with the delivered OTP",
                    "request_body": {
                        "email": "string",
                        "otp": "string (exactly 6 digits)"
                    },
                    "responses": {
                        "200": "Email verified",
                        "400": "Invalid or expired OTP",
                        "404": "No account under that email"
                    }
                },
                "resend_otp": {
                    "path": "/api/v1/accounts/resend-otp",
                    "method": "POST",
                    "description": "Re-send the verification OTP",
                    "responses": {
                        "200": "OTP resent",
                        "400": "Account already verified",
                        "404": "No account under that email"
                    }
                },
                "login": {
                    "path": "/api/v1/accounts/login",
                    "method": "POST",
                    "description": "Authenticate with email and password",
                    "responses": {
                        "200": "Token pair and user projection",
                        "401": "Invalid credentials",
                        "403": "Email not verified"
                    }
                },
                "logout": {
                    "path": "/api/v1/accounts/logout",
                    "method": "POST",
                    "description": "Revoke a refresh token",
                    "requires_auth": true,
                    "responses": {
                        "200": "Logged out",
                        "400": "Invalid refresh token",
                        "401": "Authentication required"
                    }
                },
                "me": {
                    "path": "/api/v1/accounts/me",
                    "method": "GET",
                    "description": "The authenticated user's public profile",
                    "requires_auth": true,
                    "responses": {
                        "200": "User projection",
                        "401": "Authentication required"
                    }
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
