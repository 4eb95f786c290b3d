//! Mailgun Email Service Implementation
//!
//! This module provides transactional email delivery using the Mailgun HTTP
//! API. It implements the core EmailServiceTrait for production OTP delivery.
//!
//! ## Features
//!
//! - Automatic retry logic with exponential backoff
//! - Rate limiting and server-error handling
//! - Security: Email address masking in logs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use cm_core::services::EmailServiceTrait;

use crate::email::mask_email;
use crate::InfrastructureError;

/// Mailgun email service configuration
#[derive(Debug, Clone)]
pub struct MailgunConfig {
    /// Mailgun API key
    pub api_key: String,
    /// Mailgun sending domain
    pub domain: String,
    /// From address for outbound mail
    pub from_address: String,
    /// API base URL (override for the EU region)
    pub api_base: String,
    /// Maximum retry attempts for failed requests
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl MailgunConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let api_key = std::env::var("MAILGUN_API_KEY")
            .map_err(|_| InfrastructureError::Config("MAILGUN_API_KEY not set".to_string()))?;
        let domain = std::env::var("MAILGUN_DOMAIN")
            .map_err(|_| InfrastructureError::Config("MAILGUN_DOMAIN not set".to_string()))?;
        let from_address = std::env::var("EMAIL_FROM")
            .map_err(|_| InfrastructureError::Config("EMAIL_FROM not set".to_string()))?;

        // Validate from address format
        if !from_address.contains('@') {
            return Err(InfrastructureError::Config(
                "EMAIL_FROM must contain an email address".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            domain,
            from_address,
            api_base: std::env::var("MAILGUN_API_BASE")
                .unwrap_or_else(|_| "https://api.mailgun.net/v3".to_string()),
            max_retries: std::env::var("MAILGUN_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: std::env::var("MAILGUN_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            request_timeout_secs: std::env::var("MAILGUN_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Accepted-message payload returned by the Mailgun messages endpoint
#[derive(Debug, Deserialize)]
struct MailgunResponse {
    id: String,
}

/// Mailgun email service implementation
pub struct MailgunEmailService {
    client: reqwest::Client,
    config: MailgunConfig,
}

impl MailgunEmailService {
    /// Create a new Mailgun email service
    pub fn new(config: MailgunConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Mailgun email service initialized for domain: {}",
            config.domain
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let config = MailgunConfig::from_env()?;
        Self::new(config)
    }

    /// Send an email with retry logic
    async fn send_with_retry(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let url = format!("{}/{}/messages", self.config.api_base, self.config.domain);
        let params = [
            ("from", self.config.from_address.as_str()),
            ("to", recipient),
            ("subject", subject),
            ("text", body),
        ];

        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending email attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_email(recipient)
            );

            let response = match self
                .client
                .post(&url)
                .basic_auth("api", Some(&self.config.api_key))
                .form(&params)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!(
                        "Mailgun request failed (attempt {}/{}): {}",
                        attempts, self.config.max_retries, e
                    );

                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Http(e));
                    }

                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                    continue;
                }
            };

            let status = response.status();

            if status.is_success() {
                let accepted: MailgunResponse = response.json().await?;
                info!(
                    "Email sent to {} with id: {}",
                    mask_email(recipient),
                    accepted.id
                );
                return Ok(accepted.id);
            }

            let detail = response.text().await.unwrap_or_default();

            // Retry on rate limiting and server errors only
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!(
                    "Mailgun returned {} (attempt {}/{}), backing off for {:?}",
                    status, attempts, self.config.max_retries, delay
                );

                if attempts >= self.config.max_retries {
                    return Err(InfrastructureError::Email(format!(
                        "Mailgun returned {} after {} attempts: {}",
                        status, attempts, detail
                    )));
                }

                tokio::time::sleep(delay).await;
                delay *= 2;
            } else {
                error!(
                    "Mailgun rejected message to {}: {} {}",
                    mask_email(recipient),
                    status,
                    detail
                );
                return Err(InfrastructureError::Email(format!(
                    "Mailgun returned {}: {}",
                    status, detail
                )));
            }
        }
    }
}

#[async_trait]
impl EmailServiceTrait for MailgunEmailService {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, String> {
        match self.send_with_retry(recipient, subject, body).await {
            Ok(message_id) => Ok(message_id),
            Err(e) => Err(e.to_string()),
        }
    }
}
