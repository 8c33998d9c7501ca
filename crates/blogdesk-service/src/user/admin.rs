//! Administrative user management: listing accounts and changing roles.

use std::sync::Arc;

use tracing::info;

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_database::repositories::UserRepository;
use blogdesk_entity::user::{User, UserRole};

use crate::auth::service::normalize_email;

/// Handles operator-level user management (used by the CLI).
#[derive(Debug, Clone)]
pub struct AdminUserService {
    user_repo: Arc<UserRepository>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Lists all users with pagination.
    pub async fn list_users(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        self.user_repo.find_all(page).await
    }

    /// Assigns `role` to the account registered under `email`.
    pub async fn set_role(&self, email: &str, role: UserRole) -> AppResult<User> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user with email '{email}'")))?;

        if user.role == role {
            return Ok(user);
        }

        let updated = self.user_repo.update_role(user.id, role).await?;
        info!(user_id = updated.id, role = %role, "User role changed");
        Ok(updated)
    }
}
