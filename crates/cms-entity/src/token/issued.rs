//! Token value types handed back to callers.

use serde::{Deserialize, Serialize};

/// An issued token and its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// The raw token string.
    pub token: String,
    /// Expiry, epoch seconds.
    pub expires_at: i64,
}

/// The access + refresh pair returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    /// Short-lived signed access token.
    pub access_token: IssuedToken,
    /// Long-lived opaque refresh token.
    pub refresh_token: IssuedToken,
}
