//! Refresh token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cms_core::error::{AppError, ErrorKind};
use cms_core::result::AppResult;
use cms_entity::token::{NewRefreshToken, RefreshToken, RotateRefreshToken};

use super::RefreshTokenRepository;

/// Postgres-backed refresh token rows.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (id, token, user_id, ip_address, use_count, expires_at) \
             VALUES ($1, $2, $3, $4, 0, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.token)
        .bind(data.user_id)
        .bind(&data.ip_address)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::PersistFailed, "Failed to create refresh token", e)
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::PersistFailed, "Failed to find refresh token", e)
            })
    }

    async fn rotate(&self, data: &RotateRefreshToken) -> AppResult<Option<RefreshToken>> {
        // Single statement: the token guard makes concurrent rotations of the
        // same secret serialize on the row lock, and only the first matches.
        // Expiry is re-checked against the database clock at apply time.
        sqlx::query_as::<_, RefreshToken>(
            "UPDATE refresh_tokens \
             SET token = $3, ip_address = $4, expires_at = $5, \
                 use_count = use_count + 1, updated_at = NOW() \
             WHERE id = $1 AND token = $2 \
               AND expires_at > EXTRACT(EPOCH FROM NOW())::BIGINT \
             RETURNING *",
        )
        .bind(data.id)
        .bind(&data.current_token)
        .bind(&data.new_token)
        .bind(&data.ip_address)
        .bind(data.expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::PersistFailed, "Failed to rotate refresh token", e)
        })
    }
}
