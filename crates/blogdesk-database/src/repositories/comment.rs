//! Comment repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_entity::comment::{Comment, CommentWithBlog, CommentWithUser};

const WITH_USER_SELECT: &str = "SELECT cm.*, u.name AS user_name \
     FROM comments cm JOIN users u ON u.id = cm.user_id";

const WITH_BLOG_SELECT: &str = "SELECT cm.*, b.title AS blog_title, b.slug AS blog_slug \
     FROM comments cm JOIN blogs b ON b.id = cm.blog_id";

/// Repository for post comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a comment by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    /// Find a comment joined with its author's name.
    pub async fn find_with_user(&self, id: i64) -> AppResult<Option<CommentWithUser>> {
        sqlx::query_as::<_, CommentWithUser>(&format!("{WITH_USER_SELECT} WHERE cm.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load comment", e))
    }

    /// Comments on a post, oldest first.
    pub async fn list_for_blog(
        &self,
        blog_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentWithUser>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE blog_id = ?")
            .bind(blog_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comments", e))?;

        let items = sqlx::query_as::<_, CommentWithUser>(&format!(
            "{WITH_USER_SELECT} WHERE cm.blog_id = ? \
             ORDER BY cm.created_at ASC, cm.id ASC LIMIT ? OFFSET ?"
        ))
        .bind(blog_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Comments written by a user, newest first.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentWithBlog>> {
        let total = self.count_by_user(user_id).await?;

        let items = sqlx::query_as::<_, CommentWithBlog>(&format!(
            "{WITH_BLOG_SELECT} WHERE cm.user_id = ? \
             ORDER BY cm.created_at DESC, cm.id DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user comments", e)
        })?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Every comment written by a user, newest first.
    pub async fn find_all_by_user(&self, user_id: i64) -> AppResult<Vec<CommentWithBlog>> {
        sqlx::query_as::<_, CommentWithBlog>(&format!(
            "{WITH_BLOG_SELECT} WHERE cm.user_id = ? ORDER BY cm.created_at DESC, cm.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to export user comments", e)
        })
    }

    /// Insert a comment.
    pub async fn create(&self, blog_id: i64, user_id: i64, content: &str) -> AppResult<Comment> {
        let now = Utc::now();
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (blog_id, user_id, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(blog_id)
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    /// Delete a comment.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete comment", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all comments.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comments", e))
    }

    /// Count comments written by a user.
    pub async fn count_by_user(&self, user_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count user comments", e)
            })
    }
}
