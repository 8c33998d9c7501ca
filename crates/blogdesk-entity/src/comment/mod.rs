//! Comment entities.

pub mod model;

pub use model::{Comment, CommentWithBlog, CommentWithUser};
