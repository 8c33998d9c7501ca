//! Authentication service.

use std::sync::Arc;

use tracing::{info, warn};

use blogdesk_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use blogdesk_auth::password::{PasswordHasher, PasswordValidator};
use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_database::repositories::UserRepository;
use blogdesk_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Message shared by every login failure so that callers cannot test
/// which emails are registered.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Input for account registration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Tokens plus the user they were issued for.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub tokens: TokenPair,
    pub user: User,
}

/// Handles account registration and the token lifecycle.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Registers a new author account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        let name = input.name.trim();
        if name.chars().count() < 2 {
            return Err(AppError::validation("Name must be at least 2 characters"));
        }
        let email = normalize_email(&input.email);
        self.validator.validate(&input.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                name: name.to_string(),
                email,
                password_hash,
                role: UserRole::Author,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let email = normalize_email(email);
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        self.user_repo.touch_last_login(user.id).await?;
        let tokens = self.encoder.generate_token_pair(&user)?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginResult { tokens, user })
    }

    /// Exchanges a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<LoginResult> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let tokens = self.encoder.generate_token_pair(&user)?;
        info!(user_id = user.id, "Tokens refreshed");
        Ok(LoginResult { tokens, user })
    }

    /// Resolves an access token into a request context.
    ///
    /// The role is read from the database rather than the token so that
    /// promotions and demotions apply immediately.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<RequestContext> {
        let claims = self.decoder.decode_access_token(access_token)?;
        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;
        Ok(RequestContext::new(user.id, user.role, user.email))
    }

    /// Loads the caller's account.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Changes the caller's password after verifying the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.me(ctx).await?;

        if !self.hasher.verify_password(current_password, &user.password_hash)? {
            return Err(AppError::new(
                ErrorKind::Authentication,
                "Current password is incorrect",
            ));
        }

        self.validator.validate(new_password)?;
        self.validator.validate_not_same(current_password, new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(user.id, &new_hash).await?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }
}

/// Emails are compared and stored lowercase.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
