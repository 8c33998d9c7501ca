//! # blogdesk-auth
//!
//! Authentication and authorization primitives for BlogDesk.
//!
//! ## Modules
//!
//! - `jwt` — access/refresh token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `rbac` — role permissions and ownership checks

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Permission, RbacEnforcer};
