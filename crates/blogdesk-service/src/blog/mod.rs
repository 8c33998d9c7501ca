//! Blog post services.

pub mod lookup;
pub mod model;
pub mod service;

pub use model::{BlogDetails, BlogQuery, CreateBlogInput, TagRef, UpdateBlogInput};
pub use service::BlogService;
