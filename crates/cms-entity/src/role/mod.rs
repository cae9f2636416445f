//! Role and role-assignment entities.

pub mod model;

pub use model::{Role, UserRole};
