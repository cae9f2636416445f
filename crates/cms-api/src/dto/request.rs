//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use cms_core::error::AppError;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(length(min = 1, max = 320, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password. Length policy is enforced by the session manager.
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// Runs derive-based validation and maps failures to `Validation` errors.
pub fn validate<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_core::error::ErrorKind;

    #[test]
    fn test_empty_fields_rejected() {
        let req = LoginRequest {
            email: String::new(),
            password: "pw".to_string(),
        };
        assert_eq!(validate(&req).unwrap_err().kind, ErrorKind::Validation);

        let req = RefreshRequest {
            refresh_token: String::new(),
        };
        assert!(validate(&req).is_err());
    }
}
