mod models;
pub mod records;
mod role;

pub use models::*;
pub use records::{AttendanceRecord, AttendanceStatus, Enrollment, GradeRecord, Material};
pub use role::Role;
