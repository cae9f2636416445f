//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and validates it.

use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use uuid::Uuid;

use cms_auth::jwt::Claims;
use cms_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity proven by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AppError::unauthenticated("Missing Authorization header")
                } else {
                    AppError::invalid_token("Invalid Authorization header format")
                }
            })?;

        let state = AppState::from_ref(state);
        let claims = state.jwt_decoder.verify(bearer.token())?;

        Ok(AuthUser {
            user_id: claims.user_id(),
            claims,
        })
    }
}
