//! In-memory user store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::result::AppResult;
use cms_entity::user::User;

use crate::repositories::UserRepository;

/// In-memory user store keyed by user ID.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryUserRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Removes a user, returning it if present.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    /// Makes every trait call fail with a persistence error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::persist("User store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.check_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        self.check_available()?;
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let repo = MemoryUserRepository::new();
        let user = User::new("Editor@Example.com", "hash");
        let id = user.id;
        repo.insert(user).await;

        let found = repo.find_by_email("editor@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(id));
        assert!(repo.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let repo = MemoryUserRepository::new();
        let user = User::new("a@b.com", "old");
        let id = user.id;
        repo.insert(user).await;

        assert!(repo.update_password_hash(id, "new").await.unwrap());
        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.password_hash, "new");
        assert!(!repo.update_password_hash(Uuid::new_v4(), "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store_errors() {
        let repo = MemoryUserRepository::new();
        let user = User::new("a@b.com", "hash");
        let id = user.id;
        repo.insert(user).await;

        repo.set_unavailable(true);
        assert!(repo.find_by_id(id).await.is_err());
        assert!(repo.find_by_email("a@b.com").await.is_err());

        repo.set_unavailable(false);
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }
}
