use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::access::AssignmentRegistry;
use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::{AssignmentRequest, HomeroomLabelRequest, UpdateAssignmentRequest};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::{validate_course_code, validate_subject};

pub async fn list_account_assignments(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    let assignments = AssignmentRegistry::new(store).list_by_staff(&id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(assignments)))
}

pub async fn create_account_assignment(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AssignmentRequest>,
) -> impl IntoResponse {
    validate_course_code(&req.course)?;
    if let Some(subject) = req.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        validate_subject(subject)?;
    }

    let assignment = AssignmentRegistry::new(state.store.as_ref()).create(
        &id,
        &req.course,
        req.kind,
        req.subject.as_deref(),
    )?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(assignment))))
}

pub async fn update_account_assignment(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> impl IntoResponse {
    let assignment = AssignmentRegistry::new(state.store.as_ref()).set_active(
        &id,
        &req.course,
        req.kind,
        req.subject.as_deref(),
        req.active,
    )?;

    Ok::<_, ApiError>(Json(ApiResponse::success(assignment)))
}

pub async fn delete_account_assignment(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AssignmentRequest>,
) -> impl IntoResponse {
    AssignmentRegistry::new(state.store.as_ref()).remove(
        &id,
        &req.course,
        req.kind,
        req.subject.as_deref(),
    )?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn list_course_assignments(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(course): Path<String>,
) -> impl IntoResponse {
    let assignments = AssignmentRegistry::new(state.store.as_ref()).list_by_course(&course)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(assignments)))
}

pub async fn set_homeroom_label(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(course): Path<String>,
    Json(req): Json<HomeroomLabelRequest>,
) -> impl IntoResponse {
    let assignment = AssignmentRegistry::new(state.store.as_ref())
        .set_homeroom_label(&course, req.label.as_deref())?;

    Ok::<_, ApiError>(Json(ApiResponse::success(assignment)))
}
