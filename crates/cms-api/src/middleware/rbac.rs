//! Permission guard applied as a route layer.

use std::sync::Arc;

use axum::extract::{FromRef, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use cms_entity::permission::PermissionKey;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// State for [`require_permissions`]: the app state plus the keys a route
/// demands.
#[derive(Clone)]
pub struct PermissionGuard {
    state: AppState,
    required: Arc<[PermissionKey]>,
}

impl PermissionGuard {
    pub fn new(state: AppState, required: impl IntoIterator<Item = PermissionKey>) -> Self {
        Self {
            state,
            required: required.into_iter().collect(),
        }
    }
}

impl FromRef<PermissionGuard> for AppState {
    fn from_ref(guard: &PermissionGuard) -> Self {
        guard.state.clone()
    }
}

/// Rejects the request unless the caller holds every required key.
///
/// Missing or invalid tokens yield 401, missing permissions 403. A failed
/// permission lookup is a 500, never a denial.
///
/// ```ignore
/// Router::new()
///     .route("/users/{id}/permissions", get(handler))
///     .route_layer(from_fn_with_state(
///         PermissionGuard::new(state.clone(), [PermissionKey::new("users", "read")]),
///         require_permissions,
///     ))
/// ```
pub async fn require_permissions(
    State(guard): State<PermissionGuard>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    guard
        .state
        .gate
        .require(auth.user_id, &guard.required)
        .await?;

    Ok(next.run(request).await)
}
