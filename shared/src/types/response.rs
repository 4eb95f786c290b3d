//! API response types shared across crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error response structure for API failures.
///
/// The `error` field is a stable machine-readable code; `message` is the
/// human-readable description. `details` carries structured extras such as
/// per-field validation failures or a retry-after hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp of when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error response with additional details
    pub fn with_details(mut self, details: HashMap<String, serde_json::Value>) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_omits_empty_details() {
        let response = ErrorResponse::new("invalid_otp", "Invalid or expired OTP");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"], "invalid_otp");
        assert_eq!(json["message"], "Invalid or expired OTP");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let mut details = HashMap::new();
        details.insert("retry_after_seconds".to_string(), serde_json::json!(120));
        let response =
            ErrorResponse::new("rate_limit_exceeded", "Too many requests").with_details(details);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["details"]["retry_after_seconds"], 120);
    }
}
