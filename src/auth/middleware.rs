use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::{TokenValidationError, ValidatedToken, extract_token_from_header, validate_token};
use crate::access::Caller;
use crate::server::AppState;
use crate::types::{Account, Role};

/// Extractor that requires any valid identity.
pub struct RequireCaller {
    pub caller: Caller,
    /// None for the bootstrap admin token.
    pub account: Option<Account>,
}

/// Extractor that requires an admin token or an admin-role account.
pub struct RequireAdmin {
    pub caller: Caller,
    pub token_id: String,
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    AccountInactive,
    NotAdmin,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::AccountInactive => (StatusCode::UNAUTHORIZED, "Account is deactivated"),
            AuthError::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"rollbook\""),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireCaller {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let validated = extract_and_validate_token(parts, state)?;
        let caller = match &validated.account {
            Some(account) => Caller::from_account(account),
            None => Caller::admin_token(),
        };

        Ok(RequireCaller {
            caller,
            account: validated.account,
        })
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let validated = extract_and_validate_token(parts, state)?;

        let caller = match &validated.account {
            None if validated.token.is_admin => Caller::admin_token(),
            Some(account) if account.role == Role::Admin => Caller::from_account(account),
            _ => return Err(AuthError::NotAdmin),
        };

        Ok(RequireAdmin {
            caller,
            token_id: validated.token.id,
        })
    }
}

fn extract_and_validate_token(
    parts: &Parts,
    state: &Arc<AppState>,
) -> Result<ValidatedToken, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let raw_token = extract_token_from_header(auth_header)
        .map_err(AuthError::from)?
        .ok_or(AuthError::MissingAuth)?;

    validate_token(state.store.as_ref(), &raw_token).map_err(AuthError::from)
}

impl From<TokenValidationError> for AuthError {
    fn from(e: TokenValidationError) -> Self {
        match e {
            TokenValidationError::InvalidScheme => AuthError::InvalidScheme,
            TokenValidationError::InvalidToken => AuthError::InvalidToken,
            TokenValidationError::TokenExpired => AuthError::TokenExpired,
            TokenValidationError::AccountInactive => AuthError::AccountInactive,
            TokenValidationError::InternalError => AuthError::InternalError,
        }
    }
}
