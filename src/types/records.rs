//! Student-associated records guarded by the access gate.
//!
//! Every record type names the course it belongs to through
//! [`CourseScoped`]; the gate never looks at anything else.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{CourseScoped, ScopedRecord};

/// Roster row: a student's membership in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: String,
    pub course: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<AttendanceStatus> {
        match s {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::Excused => "excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub course: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: String,
    pub student_id: String,
    pub course: String,
    pub subject: String,
    pub assessment: String,
    pub score: f64,
    pub max_score: f64,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl CourseScoped for Enrollment {
    fn course(&self) -> &str {
        &self.course
    }
}

impl ScopedRecord for Enrollment {
    fn student_id(&self) -> Option<&str> {
        Some(&self.student_id)
    }
}

impl CourseScoped for AttendanceRecord {
    fn course(&self) -> &str {
        &self.course
    }
}

impl ScopedRecord for AttendanceRecord {
    fn student_id(&self) -> Option<&str> {
        Some(&self.student_id)
    }
}

impl CourseScoped for GradeRecord {
    fn course(&self) -> &str {
        &self.course
    }
}

impl ScopedRecord for GradeRecord {
    fn student_id(&self) -> Option<&str> {
        Some(&self.student_id)
    }
}

impl CourseScoped for Material {
    fn course(&self) -> &str {
        &self.course
    }
}

// Materials belong to a course, not to a student.
impl ScopedRecord for Material {}
