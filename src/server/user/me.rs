use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::access::{Access, authorize_scoped_access};
use crate::auth::RequireCaller;
use crate::server::AppState;
use crate::server::dto::MeResponse;
use crate::server::response::{ApiError, ApiResponse};

/// The caller's identity and what the gate currently lets them see.
pub async fn get_me(auth: RequireCaller, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let access = authorize_scoped_access(state.store.as_ref(), &auth.caller, None)?;

    let (courses, students) = match access {
        Access::Unrestricted => (None, None),
        Access::Courses(scope) => (Some(scope.courses()), None),
        Access::Students(students) => (None, Some(students.into_iter().collect())),
    };

    let response = MeResponse {
        account_id: auth.caller.account_id,
        display_name: auth.account.map(|a| a.display_name),
        role: auth.caller.role,
        courses,
        students,
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(response)))
}
