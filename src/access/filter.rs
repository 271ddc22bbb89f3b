use std::collections::BTreeSet;

use super::scope::AuthorizedScope;

/// A record that belongs to exactly one course.
pub trait CourseScoped {
    fn course(&self) -> &str;
}

/// A course-scoped record that may also belong to one student.
///
/// Records without a student (course materials) are invisible to
/// student-scoped callers unless converted to a course scope first.
pub trait ScopedRecord: CourseScoped {
    fn student_id(&self) -> Option<&str> {
        None
    }
}

/// Keeps the records whose course is in `scope`.
///
/// `course_field` picks the course out of a record; nothing else about the
/// record is inspected. Unknown course codes simply drop out.
pub fn filter_by_scope<T, F>(records: Vec<T>, scope: &AuthorizedScope, course_field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if scope.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| scope.contains(course_field(r)))
        .collect()
}

/// [`filter_by_scope`] for types that know their own course.
pub fn filter_scoped<T: CourseScoped>(records: Vec<T>, scope: &AuthorizedScope) -> Vec<T> {
    filter_by_scope(records, scope, T::course)
}

/// Keeps the records that belong to one of `students`.
pub fn filter_by_students<T: ScopedRecord>(records: Vec<T>, students: &BTreeSet<String>) -> Vec<T> {
    if students.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| r.student_id().is_some_and(|id| students.contains(id)))
        .collect()
}
