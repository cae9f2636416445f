//! Auth handlers: login, refresh, me, password change.

use axum::Json;
use axum::extract::State;

use cms_core::error::{AppError, ErrorKind};
use cms_core::timeout::bounded;
use cms_database::repositories::UserRepository;
use cms_entity::token::SessionTokens;

use crate::dto::request::{ChangePasswordRequest, LoginRequest, RefreshRequest, validate};
use crate::dto::response::{MeResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientIp};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionTokens>, ApiError> {
    validate(&req)?;

    let result = state
        .session_manager
        .login(&req.email, &req.password, ip)
        .await
        .map_err(|e| {
            // Unknown email and wrong password look the same to the client.
            if e.is(ErrorKind::NotFound) {
                AppError::invalid_credentials("Invalid email or password")
            } else {
                e
            }
        })?;

    Ok(Json(result.tokens))
}

/// POST /api/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<SessionTokens>, ApiError> {
    validate(&req)?;

    let result = state
        .session_manager
        .refresh(&req.refresh_token, ip)
        .await?;

    Ok(Json(result.tokens))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = bounded(
        state.query_timeout,
        "user.find_by_id",
        state.user_repo.find_by_id(auth.user_id),
    )
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    let permissions = state.permission_resolver.resolve(user.id).await?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        permissions: permissions.into_vec(),
    }))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate(&req)?;

    state
        .session_manager
        .change_password(auth.user_id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
