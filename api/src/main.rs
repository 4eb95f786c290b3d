use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use cm_api::app::create_app;
use cm_api::config::Config;
use cm_api::middleware::auth::JwtAuth;
use cm_api::middleware::rate_limit::RateLimits;
use cm_api::routes::accounts::AppState;

use cm_core::services::account::{AccountService, EmailServiceTrait};
use cm_core::services::otp;
use cm_core::services::token::{TokenService, TokenServiceConfig};
use cm_infra::database::DatabasePool;
use cm_infra::database::mysql::{MySqlTokenBlacklistRepository, MySqlUserRepository};
use cm_infra::email::{ConsoleEmailService, MailgunEmailService};
use cm_infra::services::BcryptPasswordHasher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting CampusMart API server");

    let config = Config::from_env();

    if config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development default");
    }

    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    info!("Connected to MySQL");

    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let token_repository = Arc::new(MySqlTokenBlacklistRepository::new(
        pool.get_pool().clone(),
    ));

    let mut token_config = TokenServiceConfig::with_secret(config.jwt.secret.clone());
    token_config.issuer = config.jwt.issuer.clone();
    token_config.audience = config.jwt.audience.clone();
    token_config.access_token_expiry_minutes = config.jwt.access_token_expiry / 60;
    token_config.refresh_token_expiry_days = config.jwt.refresh_token_expiry / 86_400;
    let token_service = Arc::new(TokenService::new(token_repository, token_config));

    // The account service is generic over its email backend, so each provider
    // branch monomorphizes its own server stack.
    match config.email_provider.as_str() {
        "mailgun" => {
            let email_service = MailgunEmailService::from_env()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            info!("Email delivery: Mailgun");
            run(config, user_repository, token_service, Arc::new(email_service)).await
        }
        _ => {
            info!("Email delivery: console (OTPs are logged, not sent)");
            run(
                config,
                user_repository,
                token_service,
                Arc::new(ConsoleEmailService::new()),
            )
            .await
        }
    }
}

/// Assembles the service graph around the chosen email backend and serves it.
async fn run<E>(
    config: Config,
    user_repository: Arc<MySqlUserRepository>,
    token_service: Arc<TokenService<MySqlTokenBlacklistRepository>>,
    email_service: Arc<E>,
) -> std::io::Result<()>
where
    E: EmailServiceTrait + 'static,
{
    let password_hasher = Arc::new(BcryptPasswordHasher::new());

    let account_service = Arc::new(AccountService::new(
        user_repository,
        token_service,
        email_service,
        password_hasher,
        otp::generate_secret,
    ));

    let app_state = web::Data::new(AppState { account_service });

    let jwt = JwtAuth::new(&config.jwt);

    // Rate limiting degrades to pass-through when Redis is unreachable at
    // startup; the API stays up either way.
    let limits = match RateLimits::new(&config.rate_limit, &config.redis.url) {
        Ok(limits) => limits,
        Err(e) => {
            warn!("Redis unavailable for rate limiting ({}); limits disabled", e);
            RateLimits::disabled()
        }
    };

    let bind_address = config.bind_address();
    info!("Listening on {}", bind_address);

    let workers = config.server.workers;
    let mut server =
        HttpServer::new(move || create_app(app_state.clone(), jwt.clone(), limits.clone()));
    if workers > 0 {
        server = server.workers(workers);
    }
    server.bind(&bind_address)?.run().await
}
