//! Role-based access control: permission resolution and the authorization gate.

pub mod gate;
pub mod resolver;

pub use gate::AuthorizationGate;
pub use resolver::{PermissionResolver, PermissionSet};
