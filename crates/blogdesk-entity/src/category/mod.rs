//! Category entities.

pub mod model;

pub use model::{Category, CategoryWithCount};
