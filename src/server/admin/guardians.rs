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
use crate::server::dto::GuardianLinkRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::store::Store;
use crate::types::{Account, GuardianLink, Role};

/// Loads an account and checks it has the given role.
pub(super) fn require_role(
    store: &dyn Store,
    id: &str,
    role: Role,
    missing: &'static str,
) -> Result<Account, ApiError> {
    let account = store
        .get_account(id)
        .api_err("Failed to get account")?
        .or_not_found(missing)?;

    if account.role != role {
        return Err(ApiError::bad_request(format!(
            "Account {id} is not a {role} account"
        )));
    }
    Ok(account)
}

pub async fn create_guardian_link(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuardianLinkRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    require_role(store, &req.guardian_id, Role::Guardian, "Guardian not found")?;
    require_role(store, &req.student_id, Role::Student, "Student not found")?;

    let link = GuardianLink {
        guardian_id: req.guardian_id,
        student_id: req.student_id,
        created_at: Utc::now(),
    };

    match store.create_guardian_link(&link) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => return Err(ApiError::conflict("Guardian link already exists")),
        Err(_) => return Err(ApiError::internal("Failed to create guardian link")),
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

pub async fn list_guardian_links(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    let links = store
        .list_guardian_links(&id)
        .api_err("Failed to list guardian links")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(links)))
}

pub async fn delete_guardian_link(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path((guardian_id, student_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_guardian_link(&guardian_id, &student_id)
        .api_err("Failed to delete guardian link")?;

    if !deleted {
        return Err(ApiError::not_found("Guardian link not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
