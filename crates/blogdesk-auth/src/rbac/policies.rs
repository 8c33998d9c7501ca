//! Static role-to-permission mapping.

use std::collections::{HashMap, HashSet};

use blogdesk_entity::user::UserRole;

/// System-level permissions granted by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Write, publish, and delete one's own posts.
    ManageOwnPosts,
    /// Edit, publish, and delete any author's post.
    ManageAnyPost,
    /// Delete any comment.
    ModerateComments,
    /// Create, edit, and delete categories and tags.
    ManageCatalogue,
}

/// Role permission table.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    grants: HashMap<UserRole, HashSet<Permission>>,
}

impl RbacPolicies {
    /// Build the default policy set.
    pub fn new() -> Self {
        let author: HashSet<Permission> = [Permission::ManageOwnPosts].into_iter().collect();
        let admin: HashSet<Permission> = [
            Permission::ManageOwnPosts,
            Permission::ManageAnyPost,
            Permission::ModerateComments,
            Permission::ManageCatalogue,
        ]
        .into_iter()
        .collect();

        let mut grants = HashMap::new();
        grants.insert(UserRole::Author, author);
        grants.insert(UserRole::Admin, admin);
        Self { grants }
    }

    /// Whether `role` holds `permission`.
    pub fn has_permission(&self, role: &UserRole, permission: &Permission) -> bool {
        self.grants
            .get(role)
            .is_some_and(|set| set.contains(permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
