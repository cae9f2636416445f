//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Clock skew tolerated when checking access token expiry.
    #[serde(default)]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Checks the settings that would otherwise only fail on first use.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.access_token_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_token_ttl_minutes must be positive",
            ));
        }
        if self.refresh_token_ttl_days == 0 {
            return Err(AppError::configuration(
                "auth.refresh_token_ttl_days must be positive",
            ));
        }
        if self.password_min_length > self.password_max_length {
            return Err(AppError::configuration(
                "auth.password_min_length exceeds auth.password_max_length",
            ));
        }
        if self.argon2_iterations == 0 || self.argon2_parallelism == 0 {
            return Err(AppError::configuration(
                "auth.argon2_iterations and auth.argon2_parallelism must be positive",
            ));
        }
        if self.argon2_memory_kib < 8 * self.argon2_parallelism {
            return Err(AppError::configuration(
                "auth.argon2_memory_kib must be at least 8 * argon2_parallelism",
            ));
        }
        Ok(())
    }

    /// Access token lifetime in seconds.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_minutes as i64 * 60
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_token_ttl_days as i64 * 24 * 60 * 60
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            jwt_leeway_seconds: 0,
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    30
}

fn default_password_min() -> usize {
    8
}

fn default_password_max() -> usize {
    128
}

fn default_argon2_memory() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            jwt_secret: "secret".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_defaults_are_one_hour_and_thirty_days() {
        let config = valid();
        assert_eq!(config.access_ttl_seconds(), 3600);
        assert_eq!(config.refresh_ttl_seconds(), 30 * 86400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = AuthConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_argon2_params_rejected() {
        let config = AuthConfig {
            argon2_memory_kib: 4,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = AuthConfig {
            argon2_iterations: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }
}
