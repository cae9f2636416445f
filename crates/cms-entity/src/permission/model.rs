//! Permission entity and the role-permission join record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::key::PermissionKey;

/// A single grantable capability, unique per `(resource, action)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Resource name, e.g. `articles`.
    pub resource: String,
    /// Action name, e.g. `publish`.
    pub action: String,
}

impl Permission {
    /// Creates a new permission value.
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Returns the `resource:action` key for this permission.
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.resource, &self.action)
    }
}

/// Grant of a permission to a role (`role_permissions` row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// The role receiving the grant.
    pub role_id: Uuid,
    /// The granted permission.
    pub permission_id: Uuid,
}
