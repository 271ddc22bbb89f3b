//! Per-request access decision for student-associated data.
//!
//! ```text
//! Unauthenticated -> RoleChecked -> BypassAll            -> Responded
//!                                -> ScopeResolved -> ExplicitCourseValidated -> Responded
//!                                                 -> ImplicitlyFiltered      -> Responded
//! ```
//!
//! Identity failures end in 401 before reaching this module (see
//! `auth::RequireCaller`). A course outside the caller's scope ends in 403.
//! Any failure while deriving a scope also ends in 403.

use std::collections::BTreeSet;

use super::filter::{ScopedRecord, filter_by_students, filter_scoped};
use super::scope::{AuthorizedScope, ScopeResolver};
use crate::error::{Error, Result};
use crate::store::{RecordQuery, Store};
use crate::types::{Account, Role};

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// None for the bootstrap admin token.
    pub account_id: Option<String>,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub fn admin_token() -> Self {
        Self {
            account_id: None,
            role: Role::Admin,
        }
    }

    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: Some(account.id.clone()),
            role: account.role,
        }
    }

    fn require_account_id(&self) -> Result<&str> {
        self.account_id.as_deref().ok_or(Error::Unauthorized)
    }
}

/// What a caller may see, as decided by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Admins and supervisors.
    Unrestricted,
    /// Teachers: the courses they hold an active assignment for.
    Courses(AuthorizedScope),
    /// Guardians and students: their dependents, or themselves.
    Students(BTreeSet<String>),
}

impl Access {
    /// Applies the access value to a fetched collection.
    pub fn restrict<T: ScopedRecord>(&self, records: Vec<T>) -> Vec<T> {
        match self {
            Self::Unrestricted => records,
            Self::Courses(scope) => filter_scoped(records, scope),
            Self::Students(students) => filter_by_students(records, students),
        }
    }

    /// Store query carrying the caller's filters plus the access pre-filter.
    #[must_use]
    pub fn query(&self, course: Option<String>, student_id: Option<String>) -> RecordQuery {
        let mut query = RecordQuery {
            course,
            student_id,
            ..Default::default()
        };
        match self {
            Self::Unrestricted => {}
            Self::Courses(scope) => query.courses = Some(scope.courses()),
            Self::Students(students) => {
                query.students = Some(students.iter().cloned().collect());
            }
        }
        query
    }

    /// Rewrites a student-based access into the courses those students are
    /// enrolled in, for records that have no student of their own.
    pub fn into_course_access(self, store: &dyn Store) -> Result<Access> {
        let Self::Students(students) = self else {
            return Ok(self);
        };

        let enrollments = store
            .list_enrollments(&RecordQuery {
                students: Some(students.into_iter().collect()),
                ..Default::default()
            })
            .map_err(|e| {
                tracing::warn!("Failed to resolve enrolled courses: {e}");
                Error::Forbidden
            })?;

        Ok(Self::Courses(
            enrollments.into_iter().map(|e| e.course).collect(),
        ))
    }
}

/// Decides what `caller` may see, optionally for one explicitly requested course.
///
/// Teachers asking for a course outside their scope get `ForbiddenCourse`
/// rather than an empty result. Guardians and students are scoped by student,
/// so an explicit course only narrows their results.
pub fn authorize_scoped_access(
    store: &dyn Store,
    caller: &Caller,
    requested_course: Option<&str>,
) -> Result<Access> {
    match caller.role {
        Role::Admin | Role::Supervisor => {
            tracing::debug!(role = %caller.role, "scope bypassed");
            Ok(Access::Unrestricted)
        }
        Role::Teacher => {
            let staff_id = caller.require_account_id()?;
            let scope = ScopeResolver::new(store).resolve(staff_id).map_err(|e| {
                tracing::warn!(staff_id, "Failed to resolve course scope: {e}");
                Error::Forbidden
            })?;

            if let Some(course) = requested_course {
                if !scope.contains(course) {
                    tracing::info!(staff_id, course, "course outside scope");
                    return Err(Error::ForbiddenCourse(course.to_string()));
                }
            }
            Ok(Access::Courses(scope))
        }
        Role::Guardian => {
            let guardian_id = caller.require_account_id()?;
            let links = store.list_guardian_links(guardian_id).map_err(|e| {
                tracing::warn!(guardian_id, "Failed to resolve guardian links: {e}");
                Error::Forbidden
            })?;
            Ok(Access::Students(
                links.into_iter().map(|l| l.student_id).collect(),
            ))
        }
        Role::Student => {
            let student_id = caller.require_account_id()?;
            Ok(Access::Students(BTreeSet::from([student_id.to_string()])))
        }
    }
}

/// Gate for writes: only staff write records, and only for a course in scope.
pub fn authorize_course_write(store: &dyn Store, caller: &Caller, course: &str) -> Result<Access> {
    if !caller.role.is_staff() {
        return Err(Error::Forbidden);
    }
    authorize_scoped_access(store, caller, Some(course))
}
