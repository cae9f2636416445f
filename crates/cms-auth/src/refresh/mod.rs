//! Opaque refresh tokens: generation, persistence, and rotation.

pub mod generator;
pub mod store;

pub use store::{RefreshTokenStore, RotatedRefreshToken};
