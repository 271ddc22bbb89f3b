//! Shared glue between record handlers and the access gate.

use crate::access::{Access, Caller, authorize_course_write, authorize_scoped_access};
use crate::server::dto::RecordListParams;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::validate_course_code;
use crate::store::{RecordQuery, Store};

/// Runs the gate for a listing and builds the pre-filtered store query.
/// Handlers still pass the fetched rows through `Access::restrict`.
pub(super) fn scoped_query(
    store: &dyn Store,
    caller: &Caller,
    params: RecordListParams,
) -> Result<(Access, RecordQuery), ApiError> {
    let access = authorize_scoped_access(store, caller, params.course.as_deref())?;
    let query = access.query(params.course, params.student);
    Ok((access, query))
}

/// Gate for a write to a student-associated record.
pub(super) fn authorize_student_write(
    store: &dyn Store,
    caller: &Caller,
    course: &str,
    student_id: &str,
) -> Result<(), ApiError> {
    validate_course_code(course)?;
    authorize_course_write(store, caller, course)?;

    store
        .get_enrollment(student_id, course)
        .api_err("Failed to check enrollment")?
        .ok_or_else(|| ApiError::bad_request("Student is not enrolled in this course"))?;
    Ok(())
}

/// Author id stored on records; the bootstrap admin token has no account.
pub(super) fn author_id(caller: &Caller) -> String {
    caller
        .account_id
        .clone()
        .unwrap_or_else(|| "admin".to_string())
}
