//! Axum middleware stack.

pub mod logging;
pub mod rbac;

pub use rbac::{PermissionGuard, require_permissions};
