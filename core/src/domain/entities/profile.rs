//! Profile entity holding per-user contact and role data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user plays on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student buying on the marketplace
    Student,
    /// A vendor selling on the marketplace
    Vendor,
    /// A marketplace administrator
    Admin,
}

impl Role {
    /// Returns the canonical lowercase string for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from its lowercase string form
    ///
    /// # Returns
    ///
    /// `Some(Role)` for a recognized value, `None` otherwise
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "vendor" => Some(Role::Vendor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Profile entity, one-to-one with a user
///
/// Created in the same transaction as its user; deleted by cascade when
/// the user row goes away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifier of the owning user
    pub user_id: Uuid,

    /// Phone number, 10 to 14 digits with an optional leading `+`, globally unique
    pub phone_number: String,

    /// Marketplace role
    pub role: Role,

    /// Optional date of birth
    pub date_of_birth: Option<NaiveDate>,
}

impl Profile {
    /// Creates a new profile for the given user
    pub fn new(
        user_id: Uuid,
        phone_number: String,
        role: Role,
        date_of_birth: Option<NaiveDate>,
    ) -> Self {
        Self {
            user_id,
            phone_number,
            role,
            date_of_birth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Vendor, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(Role::parse("staff"), None);
        assert_eq!(Role::parse("STUDENT"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Vendor).unwrap();
        assert_eq!(json, "\"vendor\"");

        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_profile_creation() {
        let user_id = Uuid::new_v4();
        let dob = NaiveDate::from_ymd_opt(2002, 9, 1);
        let profile = Profile::new(user_id, "+61412345678".to_string(), Role::Student, dob);

        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.phone_number, "+61412345678");
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.date_of_birth, dob);
    }

    #[test]
    fn test_profile_serialization() {
        let profile = Profile::new(
            Uuid::new_v4(),
            "0412345678".to_string(),
            Role::Vendor,
            None,
        );

        let json = serde_json::to_string(&profile).unwrap();
        let deserialized: Profile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile, deserialized);
        assert!(json.contains("\"vendor\""));
    }
}
