//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use cms_core::config::AuthConfig;
use cms_database::memory::{MemoryRefreshTokenRepository, MemoryUserRepository};
use cms_entity::user::User;

use crate::password::{PasswordHasher, PasswordValidator};
use crate::refresh::RefreshTokenStore;
use crate::session::SessionManager;
use crate::jwt::JwtEncoder;

pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Auth settings with the cheapest Argon2 cost the crate accepts.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "unit-test-secret".to_string(),
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..AuthConfig::default()
    }
}

pub struct Fixture {
    pub config: AuthConfig,
    pub users: Arc<MemoryUserRepository>,
    pub refresh_repo: Arc<MemoryRefreshTokenRepository>,
    pub refresh: Arc<RefreshTokenStore>,
    pub hasher: PasswordHasher,
    pub sessions: SessionManager,
}

impl Fixture {
    pub fn new() -> Self {
        let config = auth_config();
        let users = Arc::new(MemoryUserRepository::new());
        let refresh_repo = Arc::new(MemoryRefreshTokenRepository::new());
        let hasher = PasswordHasher::new(&config).expect("valid argon2 params");
        let refresh = Arc::new(RefreshTokenStore::new(
            refresh_repo.clone(),
            config.refresh_ttl_seconds(),
            QUERY_TIMEOUT,
        ));
        let sessions = SessionManager::new(
            users.clone(),
            hasher.clone(),
            PasswordValidator::new(&config),
            JwtEncoder::new(&config),
            refresh.clone(),
            QUERY_TIMEOUT,
        );

        Self {
            config,
            users,
            refresh_repo,
            refresh,
            hasher,
            sessions,
        }
    }

    /// Inserts a user whose password hashes to `password`.
    pub async fn add_user(&self, email: &str, password: &str) -> User {
        let hash = self.hasher.hash_password(password).expect("hash");
        let user = User::new(email.to_string(), hash);
        self.users.insert(user.clone()).await;
        user
    }
}
