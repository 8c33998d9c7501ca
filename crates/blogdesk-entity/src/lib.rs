//! # blogdesk-entity
//!
//! Domain entity models for BlogDesk. Every struct in this crate
//! represents a database table row or a joined read model. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod blog;
pub mod category;
pub mod comment;
pub mod tag;
pub mod user;
