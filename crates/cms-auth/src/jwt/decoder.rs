//! Access token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use cms_core::config::AuthConfig;
use cms_core::error::AppError;

use super::claims::Claims;

/// Validates access tokens by signature and expiry alone.
///
/// There is no revocation lookup: a token stays valid until `exp` even if
/// the user's refresh token was rotated elsewhere in the meantime.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => {
                        AppError::invalid_token("Access token has expired")
                    }
                    JwtErrorKind::InvalidSignature => {
                        AppError::invalid_token("Invalid access token signature")
                    }
                    JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) | JwtErrorKind::Json(_) => {
                        AppError::invalid_token("Malformed access token")
                    }
                    _ => AppError::invalid_token(format!("Access token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use crate::test_support::auth_config;
    use chrono::Utc;
    use cms_core::error::ErrorKind;
    use uuid::Uuid;

    #[test]
    fn test_issue_then_verify() {
        let config = auth_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);
        let user_id = Uuid::new_v4();

        let before = Utc::now().timestamp();
        let issued = encoder.issue(user_id).unwrap();
        assert!(!issued.token.is_empty());
        assert!(issued.expires_at >= before + 3600);
        assert!(issued.expires_at <= Utc::now().timestamp() + 3600);

        let claims = decoder.verify(&issued.token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = auth_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let two_hours_ago = Utc::now().timestamp() - 7200;
        let issued = encoder.issue_at(Uuid::new_v4(), two_hours_ago).unwrap();
        let err = decoder.verify(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
        assert!(err.message.contains("expired"));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let config = auth_config();
        let mut other = auth_config();
        other.jwt_secret = "a-different-secret".to_string();

        let issued = JwtEncoder::new(&other).issue(Uuid::new_v4()).unwrap();
        let err = JwtDecoder::new(&config).verify(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let config = auth_config();
        let issued = JwtEncoder::new(&config).issue(Uuid::new_v4()).unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(String::from).collect();
        let forged = JwtEncoder::new(&config).issue(Uuid::new_v4()).unwrap();
        parts[1] = forged.token.split('.').nth(1).unwrap().to_string();
        let tampered = parts.join(".");

        let err = JwtDecoder::new(&config).verify(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&auth_config());
        for token in ["", "abc", "a.b.c", "zzz.zzz.zzz"] {
            let err = decoder.verify(token).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidToken);
        }
    }
}
