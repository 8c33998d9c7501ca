//! Tag repository implementation.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_entity::blog::BlogStatus;
use blogdesk_entity::tag::{Tag, TagWithCount};

use super::is_unique_violation;

const WITH_COUNT_SELECT: &str = "SELECT t.*, \
     (SELECT COUNT(*) FROM blog_tags bt JOIN blogs b ON b.id = bt.blog_id \
        WHERE bt.tag_id = t.id AND b.status = ?) AS posts_count \
     FROM tags t";

/// Repository for tags.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every tag by name, with published post counts.
    pub async fn list_with_counts(&self) -> AppResult<Vec<TagWithCount>> {
        sqlx::query_as::<_, TagWithCount>(&format!(
            "{WITH_COUNT_SELECT} ORDER BY t.name COLLATE NOCASE ASC, t.id ASC"
        ))
        .bind(BlogStatus::Published)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }

    /// Find a tag with its published post count.
    pub async fn find_with_count(&self, id: i64) -> AppResult<Option<TagWithCount>> {
        sqlx::query_as::<_, TagWithCount>(&format!("{WITH_COUNT_SELECT} WHERE t.id = ?"))
            .bind(BlogStatus::Published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load tag", e))
    }

    /// Find a tag by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tag by id", e))
    }

    /// Find a tag by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tag by slug", e))
    }

    /// Return the tag with `slug`, inserting it under `name` if absent.
    pub async fn find_or_create(&self, name: &str, slug: &str) -> AppResult<Tag> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO tags (name, slug, created_at, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slug)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tag", e))?;

        self.find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::internal(format!("Tag '{slug}' vanished after insert")))
    }

    /// Slugs equal to `base` or of the form `base-N`, ignoring `exclude_id`.
    pub async fn slugs_like(&self, base: &str, exclude_id: Option<i64>) -> AppResult<HashSet<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM tags WHERE (slug = ? OR slug LIKE ?) AND id <> ?",
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude_id.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up slugs", e))?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a tag.
    pub async fn create(&self, name: &str, slug: &str, description: Option<&str>) -> AppResult<Tag> {
        let now = Utc::now();
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "tags.slug") {
                AppError::conflict(format!("Tag slug '{slug}' is already in use"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create tag", e)
            }
        })
    }

    /// Overwrite a tag's name, slug, and description.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = ?, slug = ?, description = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "tags.slug") {
                AppError::conflict(format!("Tag slug '{slug}' is already in use"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to update tag", e)
            }
        })?
        .ok_or_else(|| AppError::not_found("Tag not found"))
    }

    /// Count all tags.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tags", e))
    }

    /// Delete a tag. Its post links cascade.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete tag", e))?;
        Ok(result.rows_affected() > 0)
    }
}
