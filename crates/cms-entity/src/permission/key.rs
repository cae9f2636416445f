//! The `resource:action` permission key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cms_core::error::AppError;

/// Derived lookup unit for authorization: `resource:action`.
///
/// Keys are never stored; they are built from [`Permission`](super::Permission)
/// rows when a user's grants are resolved, and parsed from route guards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Builds a key from its two halves.
    pub fn new(resource: &str, action: &str) -> Self {
        Self(format!("{resource}:{action}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the resource half.
    pub fn resource(&self) -> &str {
        self.0.split_once(':').map(|(r, _)| r).unwrap_or(&self.0)
    }

    /// Returns the action half.
    pub fn action(&self) -> &str {
        self.0.split_once(':').map(|(_, a)| a).unwrap_or("")
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((resource, action))
                if !resource.is_empty() && !action.is_empty() && !action.contains(':') =>
            {
                Ok(Self::new(resource, action))
            }
            _ => Err(AppError::validation(format!(
                "Invalid permission key '{s}': expected 'resource:action'"
            ))),
        }
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.0
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
