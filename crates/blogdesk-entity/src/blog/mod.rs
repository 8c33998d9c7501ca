//! Blog post entities.

pub mod model;
pub mod status;

pub use model::{Blog, BlogListing, BlogWrite, RelatedBlog};
pub use status::BlogStatus;
