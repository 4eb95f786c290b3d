//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenPair;
use crate::domain::value_objects::user_view::UserView;

/// Authentication response returned after a successful login
///
/// Carries the freshly issued token pair, the access token lifetime, and
/// the public projection of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new sessions
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Public view of the authenticated user
    pub user: UserView,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and a user view
    pub fn from_token_pair(token_pair: TokenPair, user: UserView) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            expires_in: token_pair.access_expires_in,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::User;

    #[test]
    fn test_from_token_pair() {
        let user = User::new(
            "carol@campus.edu".to_string(),
            "carol".to_string(),
            "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            "NBSWY3DPEB3W64TMMQQQ====".to_string(),
        );
        let view = UserView::from_parts(&user, None);
        let pair = TokenPair::new("access.jwt".to_string(), "refresh.jwt".to_string());
        let expires_in = pair.access_expires_in;

        let response = AuthResponse::from_token_pair(pair, view);

        assert_eq!(response.access_token, "access.jwt");
        assert_eq!(response.refresh_token, "refresh.jwt");
        assert_eq!(response.expires_in, expires_in);
        assert_eq!(response.user.email, "carol@campus.edu");
    }

    #[test]
    fn test_response_serialization_is_clean() {
        let user = User::new(
            "dave@campus.edu".to_string(),
            "dave".to_string(),
            "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            "JBSWY3DPEHPK3PXP".to_string(),
        );
        let view = UserView::from_parts(&user, None);
        let pair = TokenPair::new("a".to_string(), "r".to_string());

        let json = serde_json::to_string(&AuthResponse::from_token_pair(pair, view)).unwrap();

        assert!(json.contains("\"access_token\""));
        assert!(json.contains("\"refresh_token\""));
        assert!(json.contains("\"user\""));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("otp_secret"));
    }
}
