//! Route handlers organized by domain.

pub mod auth;
pub mod blog;
pub mod category;
pub mod comment;
pub mod health;
pub mod tag;
pub mod upload;
pub mod user;
