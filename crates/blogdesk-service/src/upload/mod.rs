//! Media uploads for post images and avatars.

pub mod service;

pub use service::{UploadService, UploadedFile};
