//! Permission entities and the derived permission key.

pub mod key;
pub mod model;

pub use key::PermissionKey;
pub use model::{Permission, RolePermission};
