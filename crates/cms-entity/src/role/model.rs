//! Role entity and the user-role join record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Machine name, e.g. `editor`.
    pub name: String,
    /// Name shown in the admin UI.
    pub display_name: String,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role value.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Assignment of a role to a user (`user_roles` row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    /// The user holding the role.
    pub user_id: Uuid,
    /// The assigned role.
    pub role_id: Uuid,
}
