//! In-memory role/permission store with join tables.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::result::AppResult;
use cms_entity::permission::{Permission, RolePermission};
use cms_entity::role::{Role, UserRole};

use crate::repositories::AccessControlRepository;

#[derive(Debug, Default)]
struct Tables {
    roles: HashMap<Uuid, Role>,
    permissions: HashMap<Uuid, Permission>,
    role_permissions: HashSet<RolePermission>,
    user_roles: HashSet<UserRole>,
}

/// In-memory roles, permissions, and their join records.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccessControlRepository {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryAccessControlRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a role.
    pub async fn add_role(&self, role: Role) {
        self.tables.write().await.roles.insert(role.id, role);
    }

    /// Inserts a permission.
    pub async fn add_permission(&self, permission: Permission) {
        self.tables
            .write()
            .await
            .permissions
            .insert(permission.id, permission);
    }

    /// Attaches a permission to a role.
    pub async fn grant(&self, role_id: Uuid, permission_id: Uuid) {
        self.tables
            .write()
            .await
            .role_permissions
            .insert(RolePermission {
                role_id,
                permission_id,
            });
    }

    /// Assigns a role to a user.
    pub async fn assign(&self, user_id: Uuid, role_id: Uuid) {
        self.tables
            .write()
            .await
            .user_roles
            .insert(UserRole { user_id, role_id });
    }

    /// Creates a role holding the given `(resource, action)` pairs and
    /// assigns it to the user, reusing permissions that already exist.
    pub async fn seed_role(
        &self,
        user_id: Uuid,
        name: &str,
        grants: &[(&str, &str)],
    ) -> Role {
        let role = Role::new(name, name);
        let mut tables = self.tables.write().await;
        tables.roles.insert(role.id, role.clone());

        for (resource, action) in grants {
            let existing = tables
                .permissions
                .values()
                .find(|p| p.resource == *resource && p.action == *action)
                .map(|p| p.id);
            let permission_id = match existing {
                Some(id) => id,
                None => {
                    let permission = Permission::new(*resource, *action);
                    let id = permission.id;
                    tables.permissions.insert(id, permission);
                    id
                }
            };
            tables.role_permissions.insert(RolePermission {
                role_id: role.id,
                permission_id,
            });
        }

        tables.user_roles.insert(UserRole {
            user_id,
            role_id: role.id,
        });
        role
    }

    /// Makes every lookup fail with a persistence error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::persist("Access control store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessControlRepository for MemoryAccessControlRepository {
    async fn list_roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables
            .user_roles
            .iter()
            .filter(|ur| ur.user_id == user_id)
            .filter_map(|ur| tables.roles.get(&ur.role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn list_permissions_for_roles(&self, role_ids: &[Uuid]) -> AppResult<Vec<Permission>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let wanted: HashSet<&Uuid> = role_ids.iter().collect();
        let permission_ids: HashSet<Uuid> = tables
            .role_permissions
            .iter()
            .filter(|rp| wanted.contains(&rp.role_id))
            .map(|rp| rp.permission_id)
            .collect();
        Ok(permission_ids
            .iter()
            .filter_map(|id| tables.permissions.get(id).cloned())
            .collect())
    }
}
