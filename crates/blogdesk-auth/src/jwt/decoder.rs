//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use blogdesk_core::config::AuthConfig;
use blogdesk_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates access and refresh tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    /// Validation configuration.
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
        validation.leeway = 5;

        Self {
            access_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token, &self.access_key)?;

        if claims.token_type != TokenType::Access {
            return Err(AppError::unauthorized(
                "Invalid token type: expected access token",
            ));
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self
            .decode_token(token, &self.refresh_key)
            .map_err(|_| AppError::unauthorized("Refresh token is invalid or expired"))?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::unauthorized(
                "Invalid token type: expected refresh token",
            ));
        }

        Ok(claims)
    }

    fn decode_token(&self, token: &str, key: &DecodingKey) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::unauthorized("Token has expired")
            }
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                AppError::unauthorized("Invalid token format")
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::unauthorized("Invalid token signature")
            }
            _ => AppError::unauthorized(format!("Token validation failed: {e}")),
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use blogdesk_core::config::AuthConfig;
    use blogdesk_core::error::ErrorKind;
    use blogdesk_entity::user::{User, UserRole};

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: 42,
            name: "Grace".into(),
            email: "grace@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            bio: None,
            avatar_url: None,
            website: None,
            location: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = AuthConfig::default();
        let pair = JwtEncoder::new(&config).generate_token_pair(&test_user()).unwrap();
        let claims = JwtDecoder::new(&config).decode_access_token(&pair.access_token).unwrap();

        assert_eq!(claims.user_id(), 42);
        assert_eq!(claims.email, "grace@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(pair.expires_in, 15 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = AuthConfig::default();
        let pair = JwtEncoder::new(&config).generate_token_pair(&test_user()).unwrap();
        let decoder = JwtDecoder::new(&config);

        let err = decoder.decode_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let claims = decoder.decode_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);

        assert!(decoder.decode_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let config = AuthConfig::default();
        let pair = JwtEncoder::new(&config).generate_token_pair(&test_user()).unwrap();

        let other = AuthConfig {
            jwt_secret: "another-secret".into(),
            ..AuthConfig::default()
        };
        let err = JwtDecoder::new(&other).decode_access_token(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let decoder = JwtDecoder::new(&AuthConfig::default());
        assert!(decoder.decode_access_token("not.a.jwt").is_err());
    }
}
