//! Email Service Module
//!
//! This module provides transactional email delivery for OTP codes and other
//! account mail. It includes a production Mailgun client and a console
//! implementation for development.
//!
//! ## Features
//!
//! - **Mailgun Support**: Production email via the Mailgun HTTP API
//! - **Console Implementation**: Stdout output for development
//! - **Security**: Email address masking in logs

pub mod console;
pub mod mailgun;

// Re-export commonly used types
pub use console::ConsoleEmailService;
pub use mailgun::{MailgunConfig, MailgunEmailService};

/// Mask an email address for logging
///
/// Keeps the first character of the local part and the full domain so log
/// lines stay correlatable without exposing the address.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let mut chars = local.chars();
            let first = chars.next().map(String::from).unwrap_or_default();
            format!("{}{}@{}", first, "*".repeat(chars.count()), domain)
        }
        _ => "*".repeat(email.chars().count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_keeps_domain() {
        assert_eq!(mask_email("alice@campus.edu"), "a****@campus.edu");
        assert_eq!(mask_email("b@campus.edu"), "b@campus.edu");
    }

    #[test]
    fn test_mask_email_handles_malformed_input() {
        assert_eq!(mask_email("not-an-address"), "**************");
        assert_eq!(mask_email("@campus.edu"), "***********");
        assert_eq!(mask_email(""), "");
    }
}
