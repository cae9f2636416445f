//! Role and permission lookups over the join tables.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cms_core::error::{AppError, ErrorKind};
use cms_core::result::AppResult;
use cms_entity::permission::Permission;
use cms_entity::role::Role;

use super::AccessControlRepository;

/// Postgres-backed role/permission lookups.
///
/// Two flat queries; callers union the results themselves.
#[derive(Debug, Clone)]
pub struct PgAccessControlRepository {
    pool: PgPool,
}

impl PgAccessControlRepository {
    /// Create a new access-control repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessControlRepository for PgAccessControlRepository {
    async fn list_roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::PersistFailed, "Failed to list roles for user", e)
        })
    }

    async fn list_permissions_for_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<Permission>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Permission>(
            "SELECT DISTINCT p.* FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = ANY($1)",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::PersistFailed,
                "Failed to list permissions for roles",
                e,
            )
        })
    }
}
