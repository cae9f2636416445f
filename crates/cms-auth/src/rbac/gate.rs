//! The authorization gate: does a user hold every required permission?

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use cms_core::error::AppError;
use cms_entity::permission::PermissionKey;

use super::resolver::PermissionResolver;

/// Checks resolved permissions against a required set with AND semantics.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    resolver: Arc<PermissionResolver>,
}

impl AuthorizationGate {
    pub fn new(resolver: Arc<PermissionResolver>) -> Self {
        Self { resolver }
    }

    /// Returns whether the user holds every key in `required`.
    ///
    /// An empty requirement is allowed without a lookup. A failed lookup is
    /// an error, never a denial.
    pub async fn authorize(
        &self,
        user_id: Uuid,
        required: &[PermissionKey],
    ) -> Result<bool, AppError> {
        if required.is_empty() {
            return Ok(true);
        }

        let granted = self.resolver.resolve(user_id).await?;
        Ok(required.iter().all(|key| granted.contains(key)))
    }

    /// Like [`authorize`](Self::authorize) but fails with `Forbidden`
    /// naming the missing keys.
    pub async fn require(&self, user_id: Uuid, required: &[PermissionKey]) -> Result<(), AppError> {
        if required.is_empty() {
            return Ok(());
        }

        let granted = self.resolver.resolve(user_id).await?;
        let missing = granted.missing(required);
        if missing.is_empty() {
            debug!(user_id = %user_id, required = required.len(), "Access granted");
            return Ok(());
        }

        let missing = missing
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!(user_id = %user_id, missing = %missing, "Access denied");
        Err(AppError::forbidden(format!("Missing permissions: {missing}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cms_core::error::ErrorKind;
    use cms_database::memory::MemoryAccessControlRepository;

    fn key(s: &str) -> PermissionKey {
        s.parse().unwrap()
    }

    fn gate(repo: Arc<MemoryAccessControlRepository>) -> AuthorizationGate {
        AuthorizationGate::new(Arc::new(PermissionResolver::new(
            repo,
            Duration::from_secs(5),
        )))
    }

    #[tokio::test]
    async fn test_and_semantics() {
        let repo = Arc::new(MemoryAccessControlRepository::new());
        let user_id = Uuid::new_v4();
        repo.seed_role(user_id, "editor", &[("content", "read"), ("content", "write")])
            .await;
        let gate = gate(repo);

        assert!(gate.authorize(user_id, &[key("content:read")]).await.unwrap());
        assert!(
            gate.authorize(user_id, &[key("content:read"), key("content:write")])
                .await
                .unwrap()
        );
        assert!(
            !gate
                .authorize(user_id, &[key("content:read"), key("content:delete")])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_union_across_roles_satisfies_requirement() {
        let repo = Arc::new(MemoryAccessControlRepository::new());
        let user_id = Uuid::new_v4();
        repo.seed_role(user_id, "reader", &[("content", "read")]).await;
        repo.seed_role(user_id, "admin", &[("users", "read")]).await;
        let gate = gate(repo);

        assert!(
            gate.authorize(user_id, &[key("content:read"), key("users:read")])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_empty_requirement_is_allowed() {
        let repo = Arc::new(MemoryAccessControlRepository::new());
        let gate = gate(repo.clone());
        let user_id = Uuid::new_v4();

        assert!(gate.authorize(user_id, &[]).await.unwrap());
        gate.require(user_id, &[]).await.unwrap();

        // Short-circuits before touching the store.
        repo.set_unavailable(true);
        assert!(gate.authorize(user_id, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_without_roles_is_denied() {
        let gate = gate(Arc::new(MemoryAccessControlRepository::new()));
        assert!(
            !gate
                .authorize(Uuid::new_v4(), &[key("content:read")])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_require_names_missing_keys() {
        let repo = Arc::new(MemoryAccessControlRepository::new());
        let user_id = Uuid::new_v4();
        repo.seed_role(user_id, "reader", &[("content", "read")]).await;
        let gate = gate(repo);

        let err = gate
            .require(
                user_id,
                &[key("content:read"), key("content:write"), key("users:read")],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("content:write, users:read"));
        assert!(!err.message.contains("content:read"));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_error_not_denial() {
        let repo = Arc::new(MemoryAccessControlRepository::new());
        let user_id = Uuid::new_v4();
        repo.seed_role(user_id, "reader", &[("content", "read")]).await;
        repo.set_unavailable(true);
        let gate = gate(repo);

        let err = gate
            .authorize(user_id, &[key("content:read")])
            .await
            .unwrap_err();
        assert!(err.kind.is_internal());

        let err = gate
            .require(user_id, &[key("content:read")])
            .await
            .unwrap_err();
        assert_ne!(err.kind, ErrorKind::Forbidden);
    }
}
