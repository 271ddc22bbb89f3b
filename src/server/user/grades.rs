use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireCaller;
use crate::server::AppState;
use crate::server::dto::{CreateGradeRequest, RecordListParams};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_score, validate_subject, validate_title};
use crate::types::GradeRecord;

use super::scoped::{author_id, authorize_student_write, scoped_query};

pub async fn list_grades(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordListParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (access, query) = scoped_query(store, &auth.caller, params)?;

    let grades = store.list_grades(&query).api_err("Failed to list grades")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(access.restrict(grades))))
}

pub async fn create_grade(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGradeRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    authorize_student_write(store, &auth.caller, &req.course, &req.student_id)?;

    validate_subject(&req.subject)?;
    validate_title(&req.assessment)?;
    validate_score(req.score, req.max_score)?;

    let grade = GradeRecord {
        id: Uuid::new_v4().to_string(),
        student_id: req.student_id,
        course: req.course,
        subject: req.subject.trim().to_string(),
        assessment: req.assessment.trim().to_string(),
        score: req.score,
        max_score: req.max_score,
        recorded_by: author_id(&auth.caller),
        created_at: Utc::now(),
    };

    store.create_grade(&grade).api_err("Failed to record grade")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(grade))))
}
