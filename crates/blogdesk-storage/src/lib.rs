//! # blogdesk-storage
//!
//! Storage provider implementations for uploaded media. Files live on the
//! local filesystem and are served statically by the API.

pub mod local;
pub mod naming;

pub use local::LocalStorageProvider;
pub use naming::{extension_of, stored_filename};
