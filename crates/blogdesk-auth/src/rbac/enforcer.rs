//! RBAC enforcement: role permissions combined with resource ownership.

use blogdesk_core::error::AppError;
use blogdesk_entity::user::UserRole;

use super::policies::{Permission, RbacPolicies};

/// Enforces role-based access control for BlogDesk operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Checks whether the given role has the required permission.
    pub fn require_permission(&self, role: &UserRole, permission: &Permission) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the required permission.
    pub fn has_permission(&self, role: &UserRole, permission: &Permission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Owners need `own`; everyone else needs `any`.
    pub fn require_owner_or(
        &self,
        role: &UserRole,
        actor_id: i64,
        owner_id: i64,
        own: Permission,
        any: Permission,
        message: &str,
    ) -> Result<(), AppError> {
        let allowed = if actor_id == owner_id {
            self.has_permission(role, &own)
        } else {
            self.has_permission(role, &any)
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::forbidden(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_admin_only() {
        let rbac = RbacEnforcer::new();
        assert!(rbac.require_permission(&UserRole::Admin, &Permission::ManageCatalogue).is_ok());
        assert!(rbac.require_permission(&UserRole::Author, &Permission::ManageCatalogue).is_err());
    }

    #[test]
    fn test_owner_or_admin() {
        let rbac = RbacEnforcer::new();
        let check = |role, actor, owner| {
            rbac.require_owner_or(
                &role,
                actor,
                owner,
                Permission::ManageOwnPosts,
                Permission::ManageAnyPost,
                "Not your post",
            )
        };
        assert!(check(UserRole::Author, 1, 1).is_ok());
        assert!(check(UserRole::Author, 1, 2).is_err());
        assert!(check(UserRole::Admin, 1, 2).is_ok());
    }
}
