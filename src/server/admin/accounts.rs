use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{RequireAdmin, TokenGenerator};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    CreateAccountRequest, CreateAccountTokenRequest, CreateTokenResponse, PaginationParams,
    TokenResponse, UpdateAccountRequest,
};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreOptionExt, StoreResultExt,
    paginate,
};
use crate::server::validation::validate_display_name;
use crate::types::Account;

use super::tokens::token_to_response;

pub async fn create_account(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    validate_display_name(&req.display_name)?;

    let now = Utc::now();
    let account = Account {
        id: Uuid::new_v4().to_string(),
        display_name: req.display_name.trim().to_string(),
        role: req.role,
        active: true,
        created_at: now,
        updated_at: now,
    };

    state
        .store
        .create_account(&account)
        .api_err("Failed to create account")?;

    tracing::info!(account_id = %account.id, role = %account.role, "account created");

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(account))))
}

pub async fn list_accounts(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let cursor = params.cursor.as_deref().unwrap_or("");

    let accounts = state
        .store
        .list_accounts(cursor, DEFAULT_PAGE_SIZE + 1)
        .api_err("Failed to list accounts")?;

    let (accounts, next_cursor, has_more) =
        paginate(accounts, DEFAULT_PAGE_SIZE as usize, |a| a.id.clone());

    Ok::<_, ApiError>(Json(PaginatedResponse::new(accounts, next_cursor, has_more)))
}

pub async fn get_account(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let account = state
        .store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(account)))
}

/// Renames or (de)activates an account. Deactivation only blocks
/// authentication; assignments are left as they are.
pub async fn update_account(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let mut account = state
        .store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    if let Some(name) = req.display_name {
        validate_display_name(&name)?;
        account.display_name = name.trim().to_string();
    }
    if let Some(active) = req.active {
        account.active = active;
    }
    account.updated_at = Utc::now();

    state
        .store
        .update_account(&account)
        .api_err("Failed to update account")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(account)))
}

pub async fn list_account_tokens(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let account = state
        .store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    let tokens = state
        .store
        .list_account_tokens(&account.id)
        .api_err("Failed to list account tokens")?;

    let responses: Vec<TokenResponse> = tokens.into_iter().map(token_to_response).collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(responses)))
}

pub async fn create_account_token(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateAccountTokenRequest>,
) -> impl IntoResponse {
    let account = state
        .store
        .get_account(&id)
        .api_err("Failed to get account")?
        .or_not_found("Account not found")?;

    if let Some(seconds) = req.expires_in_seconds {
        if seconds < 0 {
            return Err(ApiError::bad_request(
                "expires_in_seconds cannot be negative",
            ));
        }
    }

    let expires_at = req
        .expires_in_seconds
        .map(|s| Utc::now() + Duration::seconds(s));

    let generator = TokenGenerator::new();

    const MAX_RETRIES: u32 = 3;
    for _ in 0..MAX_RETRIES {
        let (raw_token, token) = generator
            .issue(Some(account.id.clone()), false, expires_at)
            .api_err("Failed to generate token")?;

        match state.store.create_token(&token) {
            Ok(()) => {
                return Ok((
                    StatusCode::CREATED,
                    Json(ApiResponse::success(CreateTokenResponse {
                        token: raw_token,
                        metadata: token_to_response(token),
                    })),
                ));
            }
            Err(Error::TokenLookupCollision) => continue,
            Err(_) => return Err(ApiError::internal("Failed to create token")),
        }
    }

    Err(ApiError::internal("Failed to create token after retries"))
}
