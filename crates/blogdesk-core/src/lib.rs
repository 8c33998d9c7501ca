//! # blogdesk-core
//!
//! Core crate for BlogDesk. Contains configuration schemas, pagination
//! and sorting types, slug generation, the storage trait, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other BlogDesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod slug;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
