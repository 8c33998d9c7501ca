//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use blogdesk_core::config::AppConfig;
use blogdesk_service::{
    AuthService, BlogService, CategoryService, CommentService, StatsService, TagService,
    UploadService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When this process started serving
    pub started_at: DateTime<Utc>,

    // ── Infrastructure ───────────────────────────────────────
    /// SQLite connection pool
    pub db_pool: SqlitePool,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, and token lifecycle
    pub auth_service: Arc<AuthService>,
    /// Profile, stats, export, and account deletion
    pub user_service: Arc<UserService>,
    /// Posts and the publishing workflow
    pub blog_service: Arc<BlogService>,
    pub category_service: Arc<CategoryService>,
    pub tag_service: Arc<TagService>,
    pub comment_service: Arc<CommentService>,
    /// Site-wide counters
    pub stats_service: Arc<StatsService>,
    /// Media uploads
    pub upload_service: Arc<UploadService>,
}
