//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use blogdesk_core::config::AuthConfig;
use blogdesk_core::error::AppError;
use blogdesk_entity::user::User;

use super::claims::{Claims, TokenType};

/// Creates signed JWT access and refresh tokens.
///
/// Access and refresh tokens are signed with different secrets so that a
/// refresh token can never be replayed as an access token.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in hours.
    refresh_ttl_hours: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
            refresh_ttl_hours: config.jwt_refresh_ttl_hours as i64,
        }
    }

    /// Generates a new access + refresh token pair for the given user.
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let access_exp = now + Duration::minutes(self.access_ttl_minutes);
        let refresh_exp = now + Duration::hours(self.refresh_ttl_hours);

        let access_claims = build_claims(user, now, access_exp, TokenType::Access);
        let refresh_claims = build_claims(user, now, refresh_exp, TokenType::Refresh);

        let access_token = encode(&Header::default(), &access_claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_minutes * 60,
            access_expires_at: access_exp,
            refresh_expires_at: refresh_exp,
        })
    }
}

fn build_claims(user: &User, now: DateTime<Utc>, exp: DateTime<Utc>, token_type: TokenType) -> Claims {
    Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: exp.timestamp(),
        jti: Uuid::new_v4(),
        token_type,
    }
}
