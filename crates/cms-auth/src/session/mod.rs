//! Session orchestration over credentials, access tokens, and refresh tokens.

pub mod manager;

pub use manager::{SessionManager, SessionResult};
