use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Homeroom,
    Subject,
}

impl AssignmentKind {
    pub fn parse(s: &str) -> Option<AssignmentKind> {
        match s {
            "homeroom" => Some(Self::Homeroom),
            "subject" => Some(Self::Subject),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Homeroom => "homeroom",
            Self::Subject => "subject",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One staff member's authority over one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub staff_id: String,
    pub course: String,
    pub kind: AssignmentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Human-readable label for a homeroom's course. Never set on subject rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub active: bool,
    pub assigned_at: DateTime<Utc>,
}

/// Active assignments of one course, partitioned by kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseAssignments {
    pub homeroom: Option<Assignment>,
    pub subjects: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianLink {
    pub guardian_id: String,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
}
