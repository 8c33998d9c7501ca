//! Aggregate queries for the dashboard and per-user statistics.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_entity::blog::{Blog, BlogStatus};

/// Post counts per status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct BlogStatusCounts {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
    pub archived: i64,
    /// Sum of `views` over every post.
    pub views: i64,
}

/// Aggregates over one author's posts and comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserActivity {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_views: i64,
    pub total_comments_received: i64,
    pub total_comments_written: i64,
}

/// Read-only repository for aggregate statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Create a new stats repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Post counts per status across the whole site.
    pub async fn blog_counts(&self) -> AppResult<BlogStatusCounts> {
        sqlx::query_as::<_, BlogStatusCounts>(
            "SELECT COUNT(*) AS total, \
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS published, \
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS draft, \
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0) AS archived, \
               COALESCE(SUM(views), 0) AS views \
             FROM blogs",
        )
        .bind(BlogStatus::Published)
        .bind(BlogStatus::Draft)
        .bind(BlogStatus::Archived)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to aggregate blogs", e))
    }

    /// Post and comment aggregates for one user.
    pub async fn user_activity(&self, user_id: i64) -> AppResult<UserActivity> {
        sqlx::query_as::<_, UserActivity>(
            "SELECT \
               (SELECT COUNT(*) FROM blogs WHERE user_id = ?1) AS total_posts, \
               (SELECT COUNT(*) FROM blogs WHERE user_id = ?1 AND status = ?2) AS published_posts, \
               (SELECT COUNT(*) FROM blogs WHERE user_id = ?1 AND status = ?3) AS draft_posts, \
               (SELECT COALESCE(SUM(views), 0) FROM blogs WHERE user_id = ?1) AS total_views, \
               (SELECT COUNT(*) FROM comments cm JOIN blogs b ON b.id = cm.blog_id \
                  WHERE b.user_id = ?1) AS total_comments_received, \
               (SELECT COUNT(*) FROM comments WHERE user_id = ?1) AS total_comments_written",
        )
        .bind(user_id)
        .bind(BlogStatus::Published)
        .bind(BlogStatus::Draft)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate user activity", e)
        })
    }

    /// A user's most viewed post, if any.
    pub async fn top_post(&self, user_id: i64) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs WHERE user_id = ? ORDER BY views DESC, created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find top post", e))
    }
}
