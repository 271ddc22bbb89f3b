use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::EnrollmentRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_course_code;
use crate::types::{Enrollment, Role};

use super::guardians::require_role;

pub async fn create_enrollment(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnrollmentRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    validate_course_code(&req.course)?;
    require_role(store, &req.student_id, Role::Student, "Student not found")?;

    let enrollment = Enrollment {
        student_id: req.student_id,
        course: req.course,
        enrolled_at: Utc::now(),
    };

    match store.create_enrollment(&enrollment) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => {
            return Err(ApiError::conflict("Student is already enrolled in this course"));
        }
        Err(_) => return Err(ApiError::internal("Failed to create enrollment")),
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::success(enrollment))))
}

pub async fn delete_enrollment(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((course, student_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_enrollment(&student_id, &course)
        .api_err("Failed to delete enrollment")?;

    if !deleted {
        return Err(ApiError::not_found("Enrollment not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
