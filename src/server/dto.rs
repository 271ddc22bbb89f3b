use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AssignmentKind, AttendanceStatus, Role};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountTokenRequest {
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub id: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreateTokenResponse {
    pub token: String,
    pub metadata: TokenResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Identifies one assignment of an account.
#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub course: String,
    pub kind: AssignmentKind,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub course: String,
    pub kind: AssignmentKind,
    #[serde(default)]
    pub subject: Option<String>,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct HomeroomLabelRequest {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuardianLinkRequest {
    pub guardian_id: String,
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: String,
    pub course: String,
}

/// Query parameters shared by the scoped record listings.
#[derive(Debug, Default, Deserialize)]
pub struct RecordListParams {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub student: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAttendanceRequest {
    pub student_id: String,
    pub course: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGradeRequest {
    pub student_id: String,
    pub course: String,
    pub subject: String,
    pub assessment: String,
    pub score: f64,
    pub max_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    pub course: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub role: Role,
    /// Assigned courses, for teachers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
    /// Visible students, for guardians and students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<String>>,
}
