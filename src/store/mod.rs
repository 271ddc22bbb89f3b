mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::access::codec::AssignmentKey;
use crate::error::Result;
use crate::types::*;

/// Pre-filter for record listings.
///
/// `course`/`student_id` are the caller's explicit filters; `courses`/`students`
/// carry the caller's scope. `Some(vec![])` matches nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub course: Option<String>,
    pub student_id: Option<String>,
    pub courses: Option<Vec<String>>,
    pub students: Option<Vec<String>>,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Account operations
    fn create_account(&self, account: &Account) -> Result<()>;
    fn get_account(&self, id: &str) -> Result<Option<Account>>;
    fn list_accounts(&self, cursor: &str, limit: i32) -> Result<Vec<Account>>;
    fn update_account(&self, account: &Account) -> Result<()>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_id(&self, id: &str) -> Result<Option<Token>>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_tokens(&self, cursor: &str, limit: i32) -> Result<Vec<Token>>;
    fn list_account_tokens(&self, account_id: &str) -> Result<Vec<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;

    // Assignment operations

    /// Inserts an assignment, or reactivates an inactive row with the same key.
    /// Fails with `DuplicateHomeroom` when the course already has an active
    /// homeroom and `DuplicateAssignment` when the same row is already active.
    /// The homeroom check is part of the write itself.
    fn insert_assignment(&self, assignment: &Assignment) -> Result<()>;
    fn get_assignment(&self, staff_id: &str, key: &AssignmentKey) -> Result<Option<Assignment>>;
    fn list_staff_assignments(&self, staff_id: &str) -> Result<Vec<Assignment>>;
    /// All assignments of a course (any kind, active or not) in key order.
    fn list_course_assignments(&self, course: &str) -> Result<Vec<Assignment>>;
    fn set_assignment_active(&self, staff_id: &str, key: &AssignmentKey, active: bool)
    -> Result<bool>;
    fn set_homeroom_label(&self, course: &str, label: Option<&str>) -> Result<bool>;
    fn delete_assignment(&self, staff_id: &str, key: &AssignmentKey) -> Result<bool>;

    // Guardian link operations
    fn create_guardian_link(&self, link: &GuardianLink) -> Result<()>;
    fn delete_guardian_link(&self, guardian_id: &str, student_id: &str) -> Result<bool>;
    fn list_guardian_links(&self, guardian_id: &str) -> Result<Vec<GuardianLink>>;

    // Roster operations
    fn create_enrollment(&self, enrollment: &Enrollment) -> Result<()>;
    fn get_enrollment(&self, student_id: &str, course: &str) -> Result<Option<Enrollment>>;
    fn delete_enrollment(&self, student_id: &str, course: &str) -> Result<bool>;
    fn list_enrollments(&self, query: &RecordQuery) -> Result<Vec<Enrollment>>;

    // Record operations
    fn create_attendance(&self, record: &AttendanceRecord) -> Result<()>;
    fn list_attendance(&self, query: &RecordQuery) -> Result<Vec<AttendanceRecord>>;
    fn create_grade(&self, record: &GradeRecord) -> Result<()>;
    fn list_grades(&self, query: &RecordQuery) -> Result<Vec<GradeRecord>>;
    fn create_material(&self, material: &Material) -> Result<()>;
    fn list_materials(&self, query: &RecordQuery) -> Result<Vec<Material>>;

    // Admin token check
    fn has_admin_token(&self) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
