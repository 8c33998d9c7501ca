//! Tag entities.

pub mod model;

pub use model::{BlogTag, Tag, TagWithCount};
