//! Refresh token persistence with single-use rotation.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::timeout::bounded;
use cms_database::repositories::RefreshTokenRepository;
use cms_entity::token::{IssuedToken, NewRefreshToken, RotateRefreshToken};

use super::generator::generate_secret;

/// Result of a successful rotation.
#[derive(Debug, Clone)]
pub struct RotatedRefreshToken {
    /// Owner of the rotated row.
    pub user_id: Uuid,
    /// The replacement secret and its new expiry.
    pub token: IssuedToken,
    /// How many times the row has been rotated, including this one.
    pub use_count: i64,
}

/// Issues refresh tokens and rotates them on use.
///
/// Each row holds exactly one live secret. Rotation replaces it in place with
/// a compare-and-swap on the old secret, so of two concurrent presentations
/// of the same secret at most one succeeds.
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl_seconds: i64,
    timeout: Duration,
}

impl std::fmt::Debug for RefreshTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenStore")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RefreshTokenStore {
    /// Creates a store issuing tokens valid for `ttl_seconds`.
    pub fn new(
        repo: Arc<dyn RefreshTokenRepository>,
        ttl_seconds: i64,
        timeout: Duration,
    ) -> Self {
        Self {
            repo,
            ttl_seconds,
            timeout,
        }
    }

    /// Persists a new refresh token for the user.
    pub async fn create(&self, user_id: Uuid, client_ip: IpAddr) -> Result<IssuedToken, AppError> {
        let expires_at = Utc::now().timestamp() + self.ttl_seconds;
        let data = NewRefreshToken {
            token: generate_secret(),
            user_id,
            ip_address: client_ip.to_string(),
            expires_at,
        };

        let row = bounded(self.timeout, "refresh_token.create", self.repo.create(&data)).await?;

        debug!(user_id = %user_id, token_id = %row.id, "Refresh token created");

        Ok(IssuedToken {
            token: data.token,
            expires_at: row.expires_at,
        })
    }

    /// Exchanges a live secret for a fresh one on the same row.
    ///
    /// Fails with `NotFound` for an unknown secret, one that was already
    /// rotated, or one that lost a race with a concurrent rotation. Fails
    /// with `Expired` once `expires_at <= now`; the row is left untouched.
    /// Expiry is checked again when the update is applied, so a row that
    /// expires between the read and the write still fails with `Expired`.
    pub async fn rotate(
        &self,
        secret: &str,
        client_ip: IpAddr,
    ) -> Result<RotatedRefreshToken, AppError> {
        let existing = bounded(
            self.timeout,
            "refresh_token.find_by_token",
            self.repo.find_by_token(secret),
        )
        .await?
        .ok_or_else(|| {
            warn!("Refresh attempted with unknown or already rotated token");
            AppError::not_found("Refresh token not found")
        })?;

        let now = Utc::now().timestamp();
        if existing.is_expired_at(now) {
            warn!(
                user_id = %existing.user_id,
                token_id = %existing.id,
                "Refresh attempted with expired token"
            );
            return Err(AppError::expired("Refresh token has expired"));
        }

        let data = RotateRefreshToken {
            id: existing.id,
            current_token: secret.to_string(),
            new_token: generate_secret(),
            ip_address: client_ip.to_string(),
            expires_at: now + self.ttl_seconds,
        };

        let rotated = match bounded(self.timeout, "refresh_token.rotate", self.repo.rotate(&data))
            .await?
        {
            Some(row) => row,
            None => return Err(self.classify_rotate_miss(secret).await),
        };

        info!(
            user_id = %rotated.user_id,
            token_id = %rotated.id,
            use_count = rotated.use_count,
            "Refresh token rotated"
        );

        Ok(RotatedRefreshToken {
            user_id: rotated.user_id,
            token: IssuedToken {
                token: data.new_token,
                expires_at: rotated.expires_at,
            },
            use_count: rotated.use_count,
        })
    }

    /// Works out why a guarded rotation matched nothing.
    async fn classify_rotate_miss(&self, secret: &str) -> AppError {
        let current = match bounded(
            self.timeout,
            "refresh_token.find_by_token",
            self.repo.find_by_token(secret),
        )
        .await
        {
            Ok(current) => current,
            Err(e) => return e,
        };

        match current {
            Some(row) if row.is_expired_at(Utc::now().timestamp()) => {
                warn!(
                    user_id = %row.user_id,
                    token_id = %row.id,
                    "Refresh token expired during rotation"
                );
                AppError::expired("Refresh token has expired")
            }
            _ => {
                warn!("Refresh token was rotated concurrently");
                AppError::not_found("Refresh token not found")
            }
        }
    }
}
