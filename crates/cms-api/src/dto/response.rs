//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cms_entity::permission::PermissionKey;

/// The authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub permissions: Vec<PermissionKey>,
}

/// A user's resolved permission keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionsResponse {
    pub user_id: Uuid,
    pub permissions: Vec<PermissionKey>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
