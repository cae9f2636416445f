//! # cms-auth
//!
//! Authentication and authorization core for the CMS backend.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing/verification off the async reactor, and password policy
//! - `jwt`: short-lived signed access tokens
//! - `refresh`: opaque refresh tokens with guarded rotate-on-use
//! - `session`: login, refresh, and password change orchestration
//! - `rbac`: permission aggregation across roles and the authorization gate

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod refresh;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AuthorizationGate, PermissionResolver, PermissionSet};
pub use refresh::{RefreshTokenStore, RotatedRefreshToken};
pub use session::{SessionManager, SessionResult};

#[cfg(test)]
pub(crate) mod test_support;
