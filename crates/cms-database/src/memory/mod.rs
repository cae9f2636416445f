//! In-memory repository implementations using Tokio locks.
//!
//! Suitable for tests and single-process development only. They honour the
//! same contracts as the Postgres repositories, including the guarded
//! refresh token rotation.

pub mod access;
pub mod refresh_token;
pub mod user;

pub use access::MemoryAccessControlRepository;
pub use refresh_token::MemoryRefreshTokenRepository;
pub use user::MemoryUserRepository;
