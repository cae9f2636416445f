//! # cms-api
//!
//! HTTP surface of the CMS auth core, built on Axum.
//!
//! Exposes login, refresh, identity and password change endpoints, the
//! permission guard route layer, client IP and bearer token extractors, and
//! the mapping from `AppError` to HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::{AppState, Repositories};
