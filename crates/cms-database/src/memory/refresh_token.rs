//! In-memory refresh token rows.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::result::AppResult;
use cms_entity::token::{NewRefreshToken, RefreshToken, RotateRefreshToken};

use crate::repositories::RefreshTokenRepository;

/// In-memory refresh token table keyed by row ID.
///
/// A single mutex stands in for the database row lock, so the guarded
/// rotation is atomic exactly like the `UPDATE … WHERE token = $2` statement.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenRepository {
    rows: Arc<Mutex<HashMap<Uuid, RefreshToken>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRefreshTokenRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a row by ID.
    pub async fn get(&self, id: Uuid) -> Option<RefreshToken> {
        self.rows.lock().await.get(&id).cloned()
    }

    /// Inserts a row verbatim, bypassing secret generation.
    pub async fn insert_row(&self, row: RefreshToken) {
        self.rows.lock().await.insert(row.id, row);
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    /// Makes every trait call fail with a persistence error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::persist("Refresh token store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokenRepository {
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        self.check_available()?;
        let mut rows = self.rows.lock().await;
        if rows.values().any(|r| r.token == data.token) {
            return Err(AppError::persist("Duplicate refresh token"));
        }

        let now = Utc::now();
        let row = RefreshToken {
            id: Uuid::new_v4(),
            token: data.token.clone(),
            user_id: data.user_id,
            ip_address: data.ip_address.clone(),
            use_count: 0,
            expires_at: data.expires_at,
            created_at: now,
            updated_at: now,
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        self.check_available()?;
        let rows = self.rows.lock().await;
        Ok(rows.values().find(|r| r.token == token).cloned())
    }

    async fn rotate(&self, data: &RotateRefreshToken) -> AppResult<Option<RefreshToken>> {
        self.check_available()?;
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.get_mut(&data.id) else {
            return Ok(None);
        };
        if row.token != data.current_token || row.is_expired_at(Utc::now().timestamp()) {
            return Ok(None);
        }

        row.token = data.new_token.clone();
        row.ip_address = data.ip_address.clone();
        row.expires_at = data.expires_at;
        row.use_count += 1;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_row(token: &str) -> NewRefreshToken {
        NewRefreshToken {
            token: token.to_string(),
            user_id: Uuid::new_v4(),
            ip_address: "10.0.0.1".to_string(),
            expires_at: Utc::now().timestamp() + 60,
        }
    }

    #[tokio::test]
    async fn test_rotate_requires_current_token() {
        let repo = MemoryRefreshTokenRepository::new();
        let row = repo.create(&new_row("first")).await.unwrap();

        let rotate = RotateRefreshToken {
            id: row.id,
            current_token: "first".to_string(),
            new_token: "second".to_string(),
            ip_address: "10.0.0.2".to_string(),
            expires_at: row.expires_at + 60,
        };
        let rotated = repo.rotate(&rotate).await.unwrap().unwrap();
        assert_eq!(rotated.use_count, 1);
        assert_eq!(rotated.ip_address, "10.0.0.2");

        // Same guard again: the row no longer carries "first".
        assert!(repo.rotate(&rotate).await.unwrap().is_none());
        assert!(repo.find_by_token("first").await.unwrap().is_none());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_rotate_skips_expired_row() {
        let repo = MemoryRefreshTokenRepository::new();
        let mut data = new_row("stale");
        data.expires_at = Utc::now().timestamp();
        let row = repo.create(&data).await.unwrap();

        let rotate = RotateRefreshToken {
            id: row.id,
            current_token: "stale".to_string(),
            new_token: "fresh".to_string(),
            ip_address: "10.0.0.2".to_string(),
            expires_at: row.expires_at + 3600,
        };
        assert!(repo.rotate(&rotate).await.unwrap().is_none());

        let stored = repo.get(row.id).await.unwrap();
        assert_eq!(stored.token, "stale");
        assert_eq!(stored.use_count, 0);
    }

    #[tokio::test]
    async fn test_unavailable_store_errors() {
        let repo = MemoryRefreshTokenRepository::new();
        repo.set_unavailable(true);
        let err = repo.create(&new_row("any")).await.unwrap_err();
        assert_eq!(err.kind, cms_core::error::ErrorKind::PersistFailed);
        assert!(repo.find_by_token("any").await.is_err());

        repo.set_unavailable(false);
        assert!(repo.is_empty().await);
        repo.create(&new_row("any")).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_secret_rejected() {
        let repo = MemoryRefreshTokenRepository::new();
        repo.create(&new_row("same")).await.unwrap();
        assert!(repo.create(&new_row("same")).await.is_err());
    }
}
