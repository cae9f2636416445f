//! Refresh token rows and issued token value types.

pub mod issued;
pub mod refresh;

pub use issued::{IssuedToken, SessionTokens};
pub use refresh::{NewRefreshToken, RefreshToken, RotateRefreshToken};
