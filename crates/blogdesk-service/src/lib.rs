//! # blogdesk-service
//!
//! Business logic service layer for BlogDesk. Each service orchestrates
//! repositories, the upload store, and authentication primitives to
//! implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod auth;
pub mod blog;
pub mod comment;
pub mod context;
pub mod stats;
pub mod taxonomy;
pub mod upload;
pub mod user;

mod slugs;

pub use auth::AuthService;
pub use blog::BlogService;
pub use comment::CommentService;
pub use context::RequestContext;
pub use stats::StatsService;
pub use taxonomy::{CategoryService, TagService};
pub use upload::UploadService;
pub use user::{AdminUserService, UserService};
