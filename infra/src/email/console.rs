//! Console Email Service Implementation
//!
//! A console-backed implementation of the email service for development and
//! testing. This implementation prints messages to stdout instead of sending
//! them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use cm_core::services::EmailServiceTrait;
use cm_shared::utils::validation::is_valid_email;

use crate::email::mask_email;

/// Console email service for development and testing
///
/// This implementation:
/// - Prints messages to stdout
/// - Validates recipient addresses
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Clone)]
pub struct ConsoleEmailService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to stdout
    console_output: bool,
}

impl ConsoleEmailService {
    /// Create a new console email service
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a console service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }
}

impl Default for ConsoleEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailServiceTrait for ConsoleEmailService {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, String> {
        // Validate recipient address format
        if !is_valid_email(recipient) {
            return Err(format!(
                "Invalid email address: {}",
                mask_email(recipient)
            ));
        }

        // Simulate failure if configured
        if self.simulate_failure {
            warn!(
                "Console email service simulating failure for recipient: {}",
                mask_email(recipient)
            );
            return Err("Simulated email delivery failure".to_string());
        }

        // Generate mock message ID
        let message_id = format!("console_{}", Uuid::new_v4());

        // Increment message counter
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        let masked_recipient = mask_email(recipient);

        if self.console_output {
            // Console output for development - show full message
            println!("\n{}", "=".repeat(60));
            println!("CONSOLE EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", recipient);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("Body: {}", body);
            println!("{}\n", "=".repeat(60));
        }

        // Structured logging for production
        info!(
            target: "email_service",
            provider = "console",
            recipient = %masked_recipient,
            message_id = %message_id,
            body_length = body.len(),
            "Email sent successfully (console)"
        );

        Ok(message_id)
    }
}
