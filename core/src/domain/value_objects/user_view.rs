//! Public projection of a user and their profile for API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::profile::{Profile, Role};
use crate::domain::entities::user::User;

/// Public view of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    /// Phone number as registered
    pub phone_number: String,

    /// Marketplace role
    pub role: Role,

    /// Optional date of birth
    pub date_of_birth: Option<NaiveDate>,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            phone_number: profile.phone_number.clone(),
            role: profile.role,
            date_of_birth: profile.date_of_birth,
        }
    }
}

/// Public view of a user
///
/// This is the only serialized shape a user record ever takes on the wire.
/// It deliberately carries no `password_hash` and no `otp_secret`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    /// User identifier
    pub id: Uuid,

    /// Display username
    pub username: String,

    /// Email address
    pub email: String,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Profile data, absent if no profile row exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileView>,
}

impl UserView {
    /// Builds a view from a user and their optional profile
    pub fn from_parts(user: &User, profile: Option<&Profile>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
            profile: profile.map(ProfileView::from),
        }
    }
}
