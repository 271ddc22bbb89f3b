use std::fmt;

use serde::{Deserialize, Serialize};

/// Role carried by every account. Decides which relation scopes the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Non-teaching supervisory staff (principal, coordinator).
    Supervisor,
    Teacher,
    Guardian,
    Student,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Supervisor,
        Role::Teacher,
        Role::Guardian,
        Role::Student,
    ];

    /// Converts a role string to its variant.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Self::Admin),
            "supervisor" => Some(Self::Supervisor),
            "teacher" => Some(Self::Teacher),
            "guardian" => Some(Self::Guardian),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Teacher => "teacher",
            Self::Guardian => "guardian",
            Self::Student => "student",
        }
    }

    /// Returns true for roles that may hold course assignments.
    #[must_use]
    pub const fn can_be_assigned(self) -> bool {
        matches!(self, Self::Teacher)
    }

    /// Returns true for roles allowed to write student records.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Supervisor | Self::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse("Teacher"), None);
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn test_as_str_matches_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_staff_roles() {
        let staff: Vec<Role> = Role::ALL.into_iter().filter(|r| r.is_staff()).collect();
        assert_eq!(staff, vec![Role::Admin, Role::Supervisor, Role::Teacher]);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Supervisor).unwrap();
        assert_eq!(json, "\"supervisor\"");
        let role: Role = serde_json::from_str("\"guardian\"").unwrap();
        assert_eq!(role, Role::Guardian);
    }
}
