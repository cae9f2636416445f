//! # cms-database
//!
//! PostgreSQL connection management, the repository contracts consumed by
//! the auth core, and their Postgres and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{AccessControlRepository, RefreshTokenRepository, UserRepository};
