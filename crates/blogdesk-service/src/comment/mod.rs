//! Comments on posts.

pub mod service;

pub use service::{CommentService, MAX_COMMENT_LENGTH};
