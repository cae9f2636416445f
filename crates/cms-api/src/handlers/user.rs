//! User administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::response::UserPermissionsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/users/{id}/permissions
///
/// Guarded by `users:read`.
pub async fn get_permissions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPermissionsResponse>, ApiError> {
    let permissions = state.permission_resolver.resolve(user_id).await?;

    Ok(Json(UserPermissionsResponse {
        user_id,
        permissions: permissions.into_vec(),
    }))
}
