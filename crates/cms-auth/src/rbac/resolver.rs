//! Aggregation of a user's permissions across all assigned roles.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::timeout::bounded;
use cms_database::repositories::AccessControlRepository;
use cms_entity::permission::PermissionKey;

/// The deduplicated set of permission keys a user holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    keys: BTreeSet<PermissionKey>,
}

impl PermissionSet {
    /// Returns `true` if the set grants `key`.
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns the keys of `required` this set does not grant, in order.
    pub fn missing<'a>(&self, required: &'a [PermissionKey]) -> Vec<&'a PermissionKey> {
        required.iter().filter(|k| !self.keys.contains(k)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Consumes the set into a sorted vector.
    pub fn into_vec(self) -> Vec<PermissionKey> {
        self.keys.into_iter().collect()
    }
}

impl FromIterator<PermissionKey> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Resolves the union of permissions granted by a user's roles.
///
/// Runs two flat lookups (user to roles, roles to permissions) rather than
/// one join so each stays index-only on the link tables.
pub struct PermissionResolver {
    repo: Arc<dyn AccessControlRepository>,
    timeout: Duration,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PermissionResolver {
    pub fn new(repo: Arc<dyn AccessControlRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    /// Returns every permission key the user holds through any role.
    pub async fn resolve(&self, user_id: Uuid) -> Result<PermissionSet, AppError> {
        let roles = bounded(
            self.timeout,
            "access.list_roles_for_user",
            self.repo.list_roles_for_user(user_id),
        )
        .await?;

        if roles.is_empty() {
            debug!(user_id = %user_id, "User has no roles");
            return Ok(PermissionSet::default());
        }

        let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        let permissions = bounded(
            self.timeout,
            "access.list_permissions_for_roles",
            self.repo.list_permissions_for_roles(&role_ids),
        )
        .await?;

        let set: PermissionSet = permissions.iter().map(|p| p.key()).collect();
        debug!(
            user_id = %user_id,
            roles = roles.len(),
            permissions = set.len(),
            "Resolved permissions"
        );
        Ok(set)
    }
}
