//! Access token creation.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::error;
use uuid::Uuid;

use cms_core::config::AuthConfig;
use cms_core::error::AppError;
use cms_entity::token::IssuedToken;

use super::claims::Claims;

/// Mints HS256-signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: config.access_ttl_seconds(),
        }
    }

    /// Issues an access token for the user, valid from now.
    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Issues an access token as if the current time were `now`.
    pub(crate) fn issue_at(&self, user_id: Uuid, now: i64) -> Result<IssuedToken, AppError> {
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to sign access token");
            AppError::signing(format!("Failed to encode access token: {e}"))
        })?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }
}
