//! Rate limiting middleware for the account endpoints
//!
//! Fixed-window counters stored in Redis, one scope per endpoint, keyed by
//! client IP. Each protected route gets its own [`RateLimit`] instance so
//! no request-body or path inspection is needed here. A Redis outage never
//! blocks traffic: failures are logged and the request is let through.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorTooManyRequests,
    Error,
};
use cm_shared::config::RateLimitConfig;
use futures_util::future::LocalBoxFuture;
use redis::{AsyncCommands, Client};
use serde_json::json;
use std::{
    collections::HashMap,
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use crate::dto::error::ErrorResponse;

/// Rate limiting middleware factory for a single endpoint scope
#[derive(Clone)]
pub struct RateLimit {
    scope: &'static str,
    limit: u32,
    window_seconds: u64,
    /// `None` disables the limiter entirely
    client: Option<Arc<Client>>,
}

impl RateLimit {
    /// Creates a limiter backed by the given Redis client
    pub fn new(scope: &'static str, limit: u32, window_seconds: u64, client: Arc<Client>) -> Self {
        Self {
            scope,
            limit,
            window_seconds,
            client: Some(client),
        }
    }

    /// Creates a limiter that lets every request through
    pub fn disabled(scope: &'static str) -> Self {
        Self {
            scope,
            limit: 0,
            window_seconds: 0,
            client: None,
        }
    }
}

/// One limiter per account endpoint, sharing a single Redis client.
///
/// Built once at startup and cloned into each route registration.
#[derive(Clone)]
pub struct RateLimits {
    pub register: RateLimit,
    pub verify_email: RateLimit,
    pub resend_otp: RateLimit,
    pub login: RateLimit,
}

impl RateLimits {
    /// Creates the per-endpoint limiters from configuration.
    ///
    /// Opening the client only parses the URL; no connection is made until
    /// the first request needs one.
    pub fn new(config: &RateLimitConfig, redis_url: &str) -> Result<Self, redis::RedisError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let client = Arc::new(Client::open(redis_url)?);
        let window = config.window_seconds;

        Ok(Self {
            register: RateLimit::new(
                "register",
                config.register_per_window,
                window,
                Arc::clone(&client),
            ),
            verify_email: RateLimit::new(
                "verify-email",
                config.otp_verify_per_window,
                window,
                Arc::clone(&client),
            ),
            resend_otp: RateLimit::new(
                "resend-otp",
                config.otp_resend_per_window,
                window,
                Arc::clone(&client),
            ),
            login: RateLimit::new("login", config.login_per_window, window, client),
        })
    }

    /// All limiters disabled, for tests and environments without Redis
    pub fn disabled() -> Self {
        Self {
            register: RateLimit::disabled("register"),
            verify_email: RateLimit::disabled("verify-email"),
            resend_otp: RateLimit::disabled("resend-otp"),
            login: RateLimit::disabled("login"),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            scope: self.scope,
            limit: self.limit,
            window_seconds: self.window_seconds,
            client: self.client.clone(),
        }))
    }
}

/// Rate limiting middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    scope: &'static str,
    limit: u32,
    window_seconds: u64,
    client: Option<Arc<Client>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let client = self.client.clone();
        let scope = self.scope;
        let limit = self.limit;
        let window_seconds = self.window_seconds;

        Box::pin(async move {
            let client = match client {
                Some(client) => client,
                None => return service.call(req).await,
            };

            let ip = get_client_ip(&req);
            if let Some(retry_after) = check_limit(&client, scope, &ip, limit, window_seconds).await
            {
                log::warn!(
                    "Rate limit hit for scope {} from ip {}, retry after {}s",
                    scope,
                    ip,
                    retry_after
                );
                return Err(too_many_requests(retry_after, limit));
            }

            service.call(req).await
        })
    }
}

/// Counts this request and returns the retry-after hint when over limit.
///
/// Redis failures are logged and treated as "not limited": counters are a
/// protection layer, not a dependency the API is allowed to die on.
async fn check_limit(
    client: &Client,
    scope: &str,
    ip: &str,
    limit: u32,
    window_seconds: u64,
) -> Option<i64> {
    match count_request(client, scope, ip, limit, window_seconds).await {
        Ok(retry_after) => retry_after,
        Err(e) => {
            log::error!("Rate limit check failed for scope {}: {:?}", scope, e);
            None
        }
    }
}

async fn count_request(
    client: &Client,
    scope: &str,
    ip: &str,
    limit: u32,
    window_seconds: u64,
) -> Result<Option<i64>, redis::RedisError> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let key = format!("rate_limit:{}:{}", scope, ip);

    let count: u32 = conn.incr(&key, 1).await?;

    // The first hit in a window opens it; later hits inherit the expiry
    if count == 1 {
        conn.expire::<_, ()>(&key, window_seconds as i64).await?;
    }

    if count > limit {
        let ttl: i64 = conn.ttl(&key).await?;
        return Ok(Some(ttl.max(0)));
    }

    Ok(None)
}

/// Builds the 429 error returned to a limited client
fn too_many_requests(retry_after_seconds: i64, limit: u32) -> Error {
    let response = ErrorResponse::new(
        "rate_limit_exceeded",
        "Too many requests. Please try again later.",
    )
    .with_details(HashMap::from([
        (
            "retry_after_seconds".to_string(),
            json!(retry_after_seconds),
        ),
        ("limit".to_string(), json!(limit)),
    ]));

    ErrorTooManyRequests(json!({
        "error": response.error,
        "message": response.message,
        "details": response.details,
        "timestamp": response.timestamp
    }))
}

/// Get client IP address from request
fn get_client_ip(req: &ServiceRequest) -> String {
    // Try to get IP from X-Forwarded-For header (for reverse proxy scenarios)
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            // Take the first IP from the comma-separated list
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    // Try to get IP from X-Real-IP header
    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    // Fall back to connection info
    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_get_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_srv_request();

        assert_eq!(get_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_get_client_ip_falls_back_to_real_ip() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.4"))
            .to_srv_request();

        assert_eq!(get_client_ip(&req), "198.51.100.4");
    }

    #[test]
    fn test_disabled_limits_have_no_client() {
        let limits = RateLimits::disabled();
        assert!(limits.register.client.is_none());
        assert!(limits.login.client.is_none());
    }

    #[test]
    fn test_limits_honour_enabled_flag() {
        let config = RateLimitConfig {
            enabled: false,
            ..Default::default()
        };
        let limits = RateLimits::new(&config, "redis://localhost:6379").unwrap();
        assert!(limits.register.client.is_none());
    }

    #[test]
    fn test_limits_share_one_client() {
        let config = RateLimitConfig::default();
        let limits = RateLimits::new(&config, "redis://localhost:6379").unwrap();

        let register = limits.register.client.as_ref().unwrap();
        let login = limits.login.client.as_ref().unwrap();
        assert!(Arc::ptr_eq(register, login));
    }
}
