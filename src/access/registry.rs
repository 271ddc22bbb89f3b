use chrono::Utc;

use super::codec::AssignmentKey;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Assignment, AssignmentKind, CourseAssignments};

/// Write-side operations on teacher/course assignments.
pub struct AssignmentRegistry<'a> {
    store: &'a dyn Store,
}

impl<'a> AssignmentRegistry<'a> {
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every assignment of the staff member, active or not.
    pub fn list_by_staff(&self, staff_id: &str) -> Result<Vec<Assignment>> {
        self.store.list_staff_assignments(staff_id)
    }

    /// Active assignments of a course, split into the homeroom and the
    /// subject teachers.
    pub fn list_by_course(&self, course: &str) -> Result<CourseAssignments> {
        let mut result = CourseAssignments::default();

        for assignment in self.store.list_course_assignments(course)? {
            if !assignment.active {
                continue;
            }
            match assignment.kind {
                AssignmentKind::Homeroom => result.homeroom = Some(assignment),
                AssignmentKind::Subject => result.subjects.push(assignment),
            }
        }

        Ok(result)
    }

    /// Creates an assignment.
    ///
    /// The homeroom and duplicate pre-checks give precise errors for the
    /// common case; concurrent creations for one course are arbitrated by
    /// the store's conditional insert, which fails the loser with
    /// `DuplicateHomeroom`.
    pub fn create(
        &self,
        staff_id: &str,
        course: &str,
        kind: AssignmentKind,
        subject: Option<&str>,
    ) -> Result<Assignment> {
        let key = self.key_for_write(course, kind, subject)?;

        let staff = self
            .store
            .get_account(staff_id)?
            .ok_or_else(|| Error::InvalidAssignee(format!("no account {staff_id}")))?;
        if !staff.active {
            return Err(Error::InvalidAssignee(format!(
                "account {staff_id} is deactivated"
            )));
        }
        if !staff.role.can_be_assigned() {
            return Err(Error::InvalidAssignee(format!(
                "account {staff_id} has role {}",
                staff.role
            )));
        }

        if kind == AssignmentKind::Homeroom {
            if let Some(existing) = self.list_by_course(course)?.homeroom {
                tracing::debug!(
                    course,
                    holder = %existing.staff_id,
                    "homeroom already assigned"
                );
                return Err(Error::DuplicateHomeroom(course.to_string()));
            }
        }

        if let Some(existing) = self.store.get_assignment(staff_id, &key)? {
            if existing.active {
                return Err(Error::DuplicateAssignment);
            }
        }

        let assignment = Assignment {
            staff_id: staff.id,
            course: key.course().to_string(),
            kind,
            subject: key.subject().map(str::to_string),
            label: None,
            active: true,
            assigned_at: Utc::now(),
        };
        self.store.insert_assignment(&assignment)?;

        tracing::info!(
            staff_id,
            course,
            kind = %kind,
            subject = subject.unwrap_or(""),
            "assignment created"
        );
        Ok(assignment)
    }

    /// Hard-deletes an assignment.
    pub fn remove(
        &self,
        staff_id: &str,
        course: &str,
        kind: AssignmentKind,
        subject: Option<&str>,
    ) -> Result<()> {
        let key = self.key_for_write(course, kind, subject)?;

        if !self.store.delete_assignment(staff_id, &key)? {
            return Err(Error::NotFound);
        }

        tracing::info!(staff_id, course, kind = %kind, "assignment removed");
        Ok(())
    }

    /// Flips the active flag of an existing assignment.
    pub fn set_active(
        &self,
        staff_id: &str,
        course: &str,
        kind: AssignmentKind,
        subject: Option<&str>,
        active: bool,
    ) -> Result<Assignment> {
        let key = self.key_for_write(course, kind, subject)?;

        if !self.store.set_assignment_active(staff_id, &key, active)? {
            return Err(Error::NotFound);
        }

        tracing::info!(staff_id, course, kind = %kind, active, "assignment updated");
        self.store
            .get_assignment(staff_id, &key)?
            .ok_or(Error::NotFound)
    }

    /// Sets or clears the label of the course's active homeroom assignment.
    pub fn set_homeroom_label(&self, course: &str, label: Option<&str>) -> Result<Assignment> {
        let label = label.map(str::trim).filter(|l| !l.is_empty());

        if !self.store.set_homeroom_label(course, label)? {
            return Err(Error::NotFound);
        }

        self.list_by_course(course)?.homeroom.ok_or(Error::NotFound)
    }

    fn key_for_write(
        &self,
        course: &str,
        kind: AssignmentKind,
        subject: Option<&str>,
    ) -> Result<AssignmentKey> {
        let subject = subject.map(str::trim).filter(|s| !s.is_empty());
        match (kind, subject) {
            (AssignmentKind::Subject, None) => return Err(Error::MissingSubject),
            (AssignmentKind::Homeroom, Some(_)) => {
                return Err(Error::BadRequest(
                    "homeroom assignments do not take a subject".into(),
                ));
            }
            _ => {}
        }
        AssignmentKey::new(course, kind, subject)
    }
}
