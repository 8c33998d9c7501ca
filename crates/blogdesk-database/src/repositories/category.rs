//! Category repository implementation.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_entity::blog::BlogStatus;
use blogdesk_entity::category::{Category, CategoryWithCount};

use super::is_unique_violation;

const WITH_COUNT_SELECT: &str = "SELECT c.*, \
     (SELECT COUNT(*) FROM blogs b WHERE b.category_id = c.id AND b.status = ?) AS posts_count \
     FROM categories c";

/// Repository for the category catalogue.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every category by name, with published post counts.
    pub async fn list_with_counts(&self) -> AppResult<Vec<CategoryWithCount>> {
        sqlx::query_as::<_, CategoryWithCount>(&format!(
            "{WITH_COUNT_SELECT} ORDER BY c.name COLLATE NOCASE ASC, c.id ASC"
        ))
        .bind(BlogStatus::Published)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list categories", e))
    }

    /// Find a category with its published post count.
    pub async fn find_with_count(&self, id: i64) -> AppResult<Option<CategoryWithCount>> {
        sqlx::query_as::<_, CategoryWithCount>(&format!("{WITH_COUNT_SELECT} WHERE c.id = ?"))
            .bind(BlogStatus::Published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load category", e))
    }

    /// Find a category by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find category by id", e)
            })
    }

    /// Find a category by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find category by slug", e)
            })
    }

    /// Slugs equal to `base` or of the form `base-N`, ignoring `exclude_id`.
    pub async fn slugs_like(&self, base: &str, exclude_id: Option<i64>) -> AppResult<HashSet<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM categories WHERE (slug = ? OR slug LIKE ?) AND id <> ?",
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude_id.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up slugs", e))?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a category.
    pub async fn create(&self, name: &str, slug: &str, description: Option<&str>) -> AppResult<Category> {
        let now = Utc::now();
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug, description, created_at, updated_at) \
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
            if is_unique_violation(&e, "categories.slug") {
                AppError::conflict(format!("Category slug '{slug}' is already in use"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create category", e)
            }
        })
    }

    /// Overwrite a category's name, slug, and description.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?, slug = ?, description = ?, updated_at = ? \
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
            if is_unique_violation(&e, "categories.slug") {
                AppError::conflict(format!("Category slug '{slug}' is already in use"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to update category", e)
            }
        })?
        .ok_or_else(|| AppError::not_found("Category not found"))
    }

    /// Number of posts of any status filed under a category.
    pub async fn count_posts(&self, id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE category_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count category posts", e)
            })
    }

    /// Count all categories.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count categories", e))
    }

    /// Delete a category.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete category", e))?;
        Ok(result.rows_affected() > 0)
    }
}
