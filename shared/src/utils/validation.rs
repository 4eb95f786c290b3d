//! Input validation utilities
//!
//! The account fields (username, email, phone number) each have a fixed
//! acceptance pattern; the patterns are compiled once and shared. The
//! `ValidationErrors` collector lets a caller check every field before
//! reporting, so a response can carry all failures at once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

// Word characters plus the handful of symbols allowed in handles
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.@+-]+$").unwrap()
});

// Deliberately loose: local@domain.tld shape, nothing more
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap()
});

// 10-14 digits with an optional leading +
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?\d{10,14}$").unwrap()
});

/// Check a username against the allowed pattern
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Check an email address against the basic `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check a phone number: 10-14 digits, optional leading `+`
pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Check that a string has visible content
pub fn not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validation error with field-level details
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) {
        self.add(ValidationError::new(field, message, code));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Group messages by field name, the shape API error bodies use
    pub fn to_field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
        for error in &self.errors {
            field_errors
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        field_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("alice.smith"));
        assert!(is_valid_username("alice@campus"));
        assert!(is_valid_username("alice+test"));
        assert!(is_valid_username("alice-1_2"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("alice smith"));
        assert!(!is_valid_username("alice!"));
        assert!(!is_valid_username("alice#1"));
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("alice.smith@campus.edu"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@nodot"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@@x.com"));
    }

    #[test]
    fn test_valid_phone_numbers() {
        assert!(is_valid_phone_number("5551234567"));      // 10 digits
        assert!(is_valid_phone_number("+15551234567"));
        assert!(is_valid_phone_number("12345678901234"));  // 14 digits
    }

    #[test]
    fn test_invalid_phone_numbers() {
        assert!(!is_valid_phone_number("555123456"));        // 9 digits
        assert!(!is_valid_phone_number("123456789012345"));  // 15 digits
        assert!(!is_valid_phone_number("555-123-4567"));
        assert!(!is_valid_phone_number("++15551234567"));
        assert!(!is_valid_phone_number(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Campus.EDU "), "alice@campus.edu");
    }

    #[test]
    fn test_validation_errors_collects_by_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add_error("email", "Invalid email address.", "invalid_email");
        errors.add_error("email", "Email already in use.", "duplicate");
        errors.add_error("username", "Invalid username format.", "invalid_username");

        assert!(errors.has_errors());
        assert_eq!(errors.errors().len(), 3);

        let by_field = errors.to_field_errors();
        assert_eq!(by_field["email"].len(), 2);
        assert_eq!(by_field["username"], vec!["Invalid username format."]);
    }
}
