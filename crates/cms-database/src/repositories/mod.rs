//! Repository contracts consumed by the auth core, with their Postgres
//! implementations.
//!
//! The auth crate only sees the traits; the concrete backend is chosen at
//! startup and injected as `Arc<dyn …>`.

pub mod access;
pub mod refresh_token;
pub mod user;

use async_trait::async_trait;
use uuid::Uuid;

use cms_core::result::AppResult;
use cms_entity::permission::Permission;
use cms_entity::role::Role;
use cms_entity::token::{NewRefreshToken, RefreshToken, RotateRefreshToken};
use cms_entity::user::User;

pub use access::PgAccessControlRepository;
pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;

/// User lookups and the one mutation the auth core performs.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Replace a user's password hash. Returns `false` if the user is gone.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;
}

/// Read-only role and permission lookups.
#[async_trait]
pub trait AccessControlRepository: Send + Sync + 'static {
    /// All roles assigned to the user.
    async fn list_roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    /// All permissions attached to any of the given roles.
    async fn list_permissions_for_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<Permission>>;
}

/// Persistence primitives for refresh token rows.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Insert a new row with a zero use counter.
    async fn create(&self, data: &NewRefreshToken) -> AppResult<RefreshToken>;

    /// Find the row currently carrying `token`.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Atomically replace the secret, IP and expiry and increment the use
    /// counter, but only while the row still carries `data.current_token`.
    ///
    /// Returns `None` when the guard matched nothing, i.e. another rotation
    /// committed first.
    async fn rotate(&self, data: &RotateRefreshToken) -> AppResult<Option<RefreshToken>>;
}
