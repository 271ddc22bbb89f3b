use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::auth::RequireCaller;
use crate::server::AppState;
use crate::server::dto::RecordListParams;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

use super::scoped::scoped_query;

pub async fn list_roster(
    auth: RequireCaller,
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordListParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (access, query) = scoped_query(store, &auth.caller, params)?;

    let enrollments = store
        .list_enrollments(&query)
        .api_err("Failed to list roster")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(access.restrict(enrollments))))
}
