//! Refresh token row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One issued refresh token. The row is created at login and mutated in
/// place on every rotation; it is never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Row identifier, stable across rotations.
    pub id: Uuid,
    /// The current opaque secret.
    #[serde(skip_serializing)]
    pub token: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Client IP at issuance or last rotation.
    pub ip_address: String,
    /// Number of successful rotations.
    pub use_count: i64,
    /// Absolute expiry, epoch seconds.
    pub expires_at: i64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last rotated.
    pub updated_at: DateTime<Utc>,
}

impl RefreshToken {
    /// A token whose expiry equals `now` is already expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Data required to insert a fresh refresh token row.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    /// The generated secret.
    pub token: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Client IP at issuance.
    pub ip_address: String,
    /// Absolute expiry, epoch seconds.
    pub expires_at: i64,
}

/// Replacement values applied by a guarded rotation.
#[derive(Debug, Clone)]
pub struct RotateRefreshToken {
    /// Row being rotated.
    pub id: Uuid,
    /// The secret the caller presented; the update only applies while the
    /// row still carries it.
    pub current_token: String,
    /// The replacement secret.
    pub new_token: String,
    /// Client IP of the rotating request.
    pub ip_address: String,
    /// New absolute expiry, epoch seconds.
    pub expires_at: i64,
}
