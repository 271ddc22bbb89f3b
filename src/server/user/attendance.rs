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
use crate::server::dto::{CreateAttendanceRequest, RecordListParams};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::AttendanceRecord;

use super::scoped::{author_id, authorize_student_write, scoped_query};

pub async fn list_attendance(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordListParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (access, query) = scoped_query(store, &auth.caller, params)?;

    let records = store
        .list_attendance(&query)
        .api_err("Failed to list attendance")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(access.restrict(records))))
}

pub async fn create_attendance(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAttendanceRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    authorize_student_write(store, &auth.caller, &req.course, &req.student_id)?;

    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        student_id: req.student_id,
        course: req.course,
        date: req.date,
        status: req.status,
        note: req.note.filter(|n| !n.trim().is_empty()),
        recorded_by: author_id(&auth.caller),
        created_at: Utc::now(),
    };

    store
        .create_attendance(&record)
        .api_err("Failed to record attendance")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(record))))
}
