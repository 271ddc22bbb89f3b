use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::access::{authorize_course_write, authorize_scoped_access};
use crate::auth::RequireCaller;
use crate::server::AppState;
use crate::server::dto::{CreateMaterialRequest, RecordListParams};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_course_code, validate_subject, validate_title};
use crate::types::Material;

use super::scoped::author_id;

/// Materials belong to courses, not students: guardians and students see
/// the materials of the courses their students are enrolled in.
pub async fn list_materials(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordListParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let access = authorize_scoped_access(store, &auth.caller, params.course.as_deref())?
        .into_course_access(store)?;
    let query = access.query(params.course, None);

    let materials = store
        .list_materials(&query)
        .api_err("Failed to list materials")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(access.restrict(materials))))
}

pub async fn create_material(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMaterialRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    validate_course_code(&req.course)?;
    authorize_course_write(store, &auth.caller, &req.course)?;

    validate_title(&req.title)?;
    let subject = req.subject.filter(|s| !s.trim().is_empty());
    if let Some(subject) = &subject {
        validate_subject(subject)?;
    }

    let material = Material {
        id: Uuid::new_v4().to_string(),
        course: req.course,
        subject,
        title: req.title.trim().to_string(),
        url: req.url.filter(|u| !u.trim().is_empty()),
        created_by: author_id(&auth.caller),
        created_at: Utc::now(),
    };

    store
        .create_material(&material)
        .api_err("Failed to create material")?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(material))))
}
