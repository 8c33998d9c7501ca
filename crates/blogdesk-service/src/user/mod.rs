//! User self-service and administrative user management.

pub mod admin;
pub mod service;

pub use admin::AdminUserService;
pub use service::{TopPost, UserExport, UserService, UserStats};
