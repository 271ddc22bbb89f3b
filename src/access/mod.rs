//! Course-scoped access control.
//!
//! Assignments relate teachers to courses ([`registry`]); a teacher's active
//! assignments make up their [`AuthorizedScope`] ([`scope`]); the [`gate`]
//! turns a caller into an [`Access`] value that every record handler applies
//! through the same [`filter`] functions.

pub mod codec;
mod filter;
pub mod gate;
pub mod registry;
pub mod scope;

pub use codec::AssignmentKey;
pub use filter::{CourseScoped, ScopedRecord, filter_by_scope, filter_by_students, filter_scoped};
pub use gate::{Access, Caller, authorize_course_write, authorize_scoped_access};
pub use registry::AssignmentRegistry;
pub use scope::{AuthorizedScope, ScopeResolver};
