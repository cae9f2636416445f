//! Session manager: login, refresh, and password change.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use cms_core::error::AppError;
use cms_core::timeout::bounded;
use cms_database::repositories::UserRepository;
use cms_entity::token::SessionTokens;

use crate::jwt::JwtEncoder;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::refresh::RefreshTokenStore;

/// Tokens handed back by login and refresh, with the user they belong to.
#[derive(Debug, Clone)]
pub struct SessionResult {
    /// Authenticated user.
    pub user_id: Uuid,
    /// New access token and refresh token.
    pub tokens: SessionTokens,
}

/// Coordinates credential checks and token issuance.
///
/// Holds no per-session state; everything durable lives in the refresh
/// token store.
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    refresh: Arc<RefreshTokenStore>,
    timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("encoder", &self.encoder)
            .field("refresh", &self.refresh)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        encoder: JwtEncoder,
        refresh: Arc<RefreshTokenStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
            refresh,
            timeout,
        }
    }

    /// Authenticates by email and password and opens a new session.
    ///
    /// An unknown email fails with `NotFound`, a wrong password with
    /// `InvalidCredentials`. The HTTP layer folds both into one response.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_ip: IpAddr,
    ) -> Result<SessionResult, AppError> {
        let user = bounded(self.timeout, "user.find_by_email", self.users.find_by_email(email))
            .await?
            .ok_or_else(|| {
                warn!(ip = %client_ip, "Login failed: unknown email");
                AppError::not_found("User not found")
            })?;

        let valid = self
            .hasher
            .verify_password_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            warn!(user_id = %user.id, ip = %client_ip, "Login failed: invalid password");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        }

        let access_token = self.encoder.issue(user.id)?;
        let refresh_token = self.refresh.create(user.id, client_ip).await?;

        info!(user_id = %user.id, ip = %client_ip, "User logged in");

        Ok(SessionResult {
            user_id: user.id,
            tokens: SessionTokens {
                access_token,
                refresh_token,
            },
        })
    }

    /// Exchanges a refresh token for a new access token and a rotated
    /// refresh token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client_ip: IpAddr,
    ) -> Result<SessionResult, AppError> {
        let rotated = self.refresh.rotate(refresh_token, client_ip).await?;

        let user = bounded(
            self.timeout,
            "user.find_by_id",
            self.users.find_by_id(rotated.user_id),
        )
        .await?
        .ok_or_else(|| {
            warn!(user_id = %rotated.user_id, "Refresh token owner no longer exists");
            AppError::not_found("User not found")
        })?;

        let access_token = self.encoder.issue(user.id)?;

        info!(
            user_id = %user.id,
            ip = %client_ip,
            use_count = rotated.use_count,
            "Session refreshed"
        );

        Ok(SessionResult {
            user_id: user.id,
            tokens: SessionTokens {
                access_token,
                refresh_token: rotated.token,
            },
        })
    }

    /// Changes a user's password after checking the current one.
    ///
    /// Refresh tokens already issued stay valid.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        self.validator.validate(new_password)?;
        self.validator
            .validate_not_same(current_password, new_password)?;

        let user = bounded(self.timeout, "user.find_by_id", self.users.find_by_id(user_id))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let valid = self
            .hasher
            .verify_password_blocking(current_password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            warn!(user_id = %user_id, "Password change rejected: wrong current password");
            return Err(AppError::invalid_credentials(
                "Current password is incorrect",
            ));
        }

        let new_hash = self
            .hasher
            .hash_password_blocking(new_password.to_string())
            .await?;

        let updated = bounded(
            self.timeout,
            "user.update_password_hash",
            self.users.update_password_hash(user_id, &new_hash),
        )
        .await?;
        if !updated {
            return Err(AppError::not_found("User not found"));
        }

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
