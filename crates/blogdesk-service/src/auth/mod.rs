//! Registration, login, token refresh, and credential management.

pub mod service;

pub use service::{AuthService, LoginResult, RegisterInput};
