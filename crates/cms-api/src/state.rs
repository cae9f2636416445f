//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use cms_auth::jwt::{JwtDecoder, JwtEncoder};
use cms_auth::password::{PasswordHasher, PasswordValidator};
use cms_auth::rbac::{AuthorizationGate, PermissionResolver};
use cms_auth::refresh::RefreshTokenStore;
use cms_auth::session::SessionManager;
use cms_core::config::{AuthConfig, ServerConfig};
use cms_core::error::AppError;
use cms_database::DatabasePool;
use cms_database::repositories::{
    AccessControlRepository, RefreshTokenRepository, UserRepository,
};

/// The three stores the auth core reads and writes.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub access: Arc<dyn AccessControlRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// HTTP server settings (CORS origins, proxy header trust)
    pub server: Arc<ServerConfig>,
    /// Upper bound on each store call made directly by handlers
    pub query_timeout: Duration,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running against in-memory stores
    pub db_pool: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    /// Access token validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Login, refresh and password change
    pub session_manager: Arc<SessionManager>,
    /// Permission aggregation across roles
    pub permission_resolver: Arc<PermissionResolver>,
    /// Route-level permission checks
    pub gate: Arc<AuthorizationGate>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wires the auth components over the given stores.
    pub fn new(
        server: ServerConfig,
        auth: &AuthConfig,
        query_timeout: Duration,
        repos: Repositories,
        db_pool: Option<DatabasePool>,
    ) -> Result<Self, AppError> {
        let hasher = PasswordHasher::new(auth)?;
        let refresh_store = Arc::new(RefreshTokenStore::new(
            repos.refresh_tokens,
            auth.refresh_ttl_seconds(),
            query_timeout,
        ));
        let session_manager = Arc::new(SessionManager::new(
            repos.users.clone(),
            hasher,
            PasswordValidator::new(auth),
            JwtEncoder::new(auth),
            refresh_store,
            query_timeout,
        ));
        let permission_resolver = Arc::new(PermissionResolver::new(repos.access, query_timeout));
        let gate = Arc::new(AuthorizationGate::new(permission_resolver.clone()));

        Ok(Self {
            server: Arc::new(server),
            query_timeout,
            db_pool,
            jwt_decoder: Arc::new(JwtDecoder::new(auth)),
            session_manager,
            permission_resolver,
            gate,
            user_repo: repos.users,
        })
    }
}
