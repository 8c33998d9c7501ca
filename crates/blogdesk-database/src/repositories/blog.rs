//! Blog post repository implementation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use blogdesk_core::error::{AppError, ErrorKind};
use blogdesk_core::result::AppResult;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_core::types::sorting::SortField;
use blogdesk_entity::blog::{Blog, BlogListing, BlogStatus, BlogWrite, RelatedBlog};
use blogdesk_entity::tag::BlogTag;

use super::{contains_pattern, is_unique_violation};

/// Columns accepted for `sort_by`.
pub const BLOG_SORT_FIELDS: &[&str] = &["created_at", "updated_at", "published_at", "title", "views"];

/// Select list shared by every query that returns [`BlogListing`] rows.
const LISTING_SELECT: &str = "SELECT b.id, b.user_id, b.category_id, b.title, b.slug, b.excerpt, \
     b.content, b.featured_image, b.meta_title, b.meta_description, b.status, b.is_featured, \
     b.allow_comments, b.views, b.created_at, b.updated_at, b.published_at, \
     u.name AS author_name, c.name AS category_name, c.slug AS category_slug, \
     (SELECT COUNT(*) FROM comments cm WHERE cm.blog_id = b.id) AS comments_count";

const LISTING_FROM: &str = " FROM blogs b \
     JOIN users u ON u.id = b.user_id \
     LEFT JOIN categories c ON c.id = b.category_id";

/// Filters for the blog list query. `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    /// Substring matched against title, excerpt, and content.
    pub search: Option<String>,
    /// Restrict to one status.
    pub status: Option<BlogStatus>,
    /// Restrict to one author.
    pub author_id: Option<i64>,
    /// Category id or slug.
    pub category: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
    /// Featured flag.
    pub featured: Option<bool>,
}

impl BlogFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");

        if let Some(status) = self.status {
            qb.push(" AND b.status = ").push_bind(status);
        }
        if let Some(author_id) = self.author_id {
            qb.push(" AND b.user_id = ").push_bind(author_id);
        }
        if let Some(featured) = self.featured {
            qb.push(" AND b.is_featured = ").push_bind(featured);
        }
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            match category.parse::<i64>() {
                Ok(id) => qb.push(" AND b.category_id = ").push_bind(id),
                Err(_) => qb.push(" AND c.slug = ").push_bind(category.to_lowercase()),
            };
        }
        if let Some(tag) = self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            qb.push(
                " AND EXISTS (SELECT 1 FROM blog_tags bt JOIN tags t ON t.id = bt.tag_id \
                 WHERE bt.blog_id = b.id AND t.slug = ",
            )
            .push_bind(tag.to_lowercase())
            .push(")");
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(search);
            qb.push(" AND (b.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR b.excerpt LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR b.content LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
    }
}

/// Map a requested sort field onto a known column.
fn sort_column(sort: &SortField) -> &'static str {
    match sort.field.as_str() {
        "updated_at" => "b.updated_at",
        "published_at" => "b.published_at",
        "title" => "b.title",
        "views" => "b.views",
        _ => "b.created_at",
    }
}

/// Repository for blog posts and their tag links.
#[derive(Debug, Clone)]
pub struct BlogRepository {
    pool: SqlitePool,
}

impl BlogRepository {
    /// Create a new blog repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a post row by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find blog by id", e))
    }

    /// Find a post row by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find blog by slug", e)
            })
    }

    /// Find a joined listing row by primary key.
    pub async fn find_listing(&self, id: i64) -> AppResult<Option<BlogListing>> {
        sqlx::query_as::<_, BlogListing>(&format!("{LISTING_SELECT}{LISTING_FROM} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load blog", e))
    }

    /// List posts matching `filter`, sorted and paginated.
    pub async fn list(
        &self,
        filter: &BlogFilter,
        sort: &SortField,
        page: &PageRequest,
    ) -> AppResult<PageResponse<BlogListing>> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
        count_qb.push(LISTING_FROM);
        filter.push_where(&mut count_qb);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count blogs", e))?;

        let column = sort_column(sort);
        let direction = sort.direction.as_sql();

        let mut qb = QueryBuilder::<Sqlite>::new(LISTING_SELECT);
        qb.push(LISTING_FROM);
        filter.push_where(&mut qb);
        qb.push(format!(" ORDER BY {column} {direction}, b.id {direction}"));
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());

        let items = qb
            .build_query_as::<BlogListing>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list blogs", e))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Most recently created posts of any status.
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Blog>> {
        sqlx::query_as::<_, Blog>("SELECT * FROM blogs ORDER BY created_at DESC, id DESC LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list latest blogs", e)
            })
    }

    /// All posts written by `user_id`, newest first.
    pub async fn find_all_by_user(&self, user_id: i64) -> AppResult<Vec<Blog>> {
        sqlx::query_as::<_, Blog>(
            "SELECT * FROM blogs WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user blogs", e))
    }

    /// Slugs equal to `base` or of the form `base-N`, ignoring `exclude_id`.
    pub async fn slugs_like(&self, base: &str, exclude_id: Option<i64>) -> AppResult<HashSet<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM blogs WHERE (slug = ? OR slug LIKE ?) AND id <> ?",
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude_id.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up slugs", e))?;
        Ok(rows.into_iter().collect())
    }

    /// Insert a post and its tag links in one transaction.
    pub async fn create(&self, user_id: i64, data: &BlogWrite, tag_ids: &[i64]) -> AppResult<Blog> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let blog = sqlx::query_as::<_, Blog>(
            "INSERT INTO blogs (user_id, category_id, title, slug, excerpt, content, featured_image, \
             meta_title, meta_description, status, is_featured, allow_comments, views, \
             created_at, updated_at, published_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.excerpt)
        .bind(&data.content)
        .bind(&data.featured_image)
        .bind(&data.meta_title)
        .bind(&data.meta_description)
        .bind(data.status)
        .bind(data.is_featured)
        .bind(data.allow_comments)
        .bind(now)
        .bind(now)
        .bind(data.published_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &data.slug, "Failed to create blog"))?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) VALUES (?, ?)")
                .bind(blog.id)
                .bind(*tag_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to link tag", e))?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(blog)
    }

    /// Overwrite a post's editable columns. `tag_ids = Some(..)` replaces the tag set.
    pub async fn update(&self, id: i64, data: &BlogWrite, tag_ids: Option<&[i64]>) -> AppResult<Blog> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let blog = sqlx::query_as::<_, Blog>(
            "UPDATE blogs SET category_id = ?, title = ?, slug = ?, excerpt = ?, content = ?, \
             featured_image = ?, meta_title = ?, meta_description = ?, status = ?, \
             is_featured = ?, allow_comments = ?, published_at = ?, updated_at = ? \
             WHERE id = ? \
             RETURNING *",
        )
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.excerpt)
        .bind(&data.content)
        .bind(&data.featured_image)
        .bind(&data.meta_title)
        .bind(&data.meta_description)
        .bind(data.status)
        .bind(data.is_featured)
        .bind(data.allow_comments)
        .bind(data.published_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &data.slug, "Failed to update blog"))?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

        if let Some(tag_ids) = tag_ids {
            sqlx::query("DELETE FROM blog_tags WHERE blog_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear tags", e))?;
            for tag_id in tag_ids {
                sqlx::query("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) VALUES (?, ?)")
                    .bind(id)
                    .bind(*tag_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to link tag", e)
                    })?;
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(blog)
    }

    /// Change a post's status, keeping an existing `published_at`.
    pub async fn set_status(
        &self,
        id: i64,
        status: BlogStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> AppResult<Blog> {
        sqlx::query_as::<_, Blog>(
            "UPDATE blogs SET status = ?, published_at = COALESCE(published_at, ?), updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(published_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update blog status", e))?
        .ok_or_else(|| AppError::not_found("Blog not found"))
    }

    /// Atomically increment the view counter and return the new value.
    pub async fn increment_views(&self, id: i64) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("UPDATE blogs SET views = views + 1 WHERE id = ? RETURNING views")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record view", e))?
            .ok_or_else(|| AppError::not_found("Blog not found"))
    }

    /// Delete a post. Comments and tag links cascade.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete blog", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Tags attached to any of `blog_ids`, ordered by name.
    pub async fn tags_for(&self, blog_ids: &[i64]) -> AppResult<Vec<BlogTag>> {
        if blog_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT bt.blog_id, t.id, t.name, t.slug FROM blog_tags bt \
             JOIN tags t ON t.id = bt.tag_id WHERE bt.blog_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in blog_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY t.name ASC");

        qb.build_query_as::<BlogTag>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load blog tags", e))
    }

    /// Published posts sharing the category or a tag with `blog`.
    pub async fn related(&self, blog: &Blog, limit: i64) -> AppResult<Vec<RelatedBlog>> {
        let sql = format!(
            "SELECT * FROM ({LISTING_SELECT}, \
               (SELECT COUNT(*) FROM blog_tags bt WHERE bt.blog_id = b.id \
                  AND bt.tag_id IN (SELECT tag_id FROM blog_tags WHERE blog_id = ?)) AS shared_tags \
               {LISTING_FROM} \
               WHERE b.status = ? AND b.id <> ?) r \
             WHERE r.shared_tags > 0 OR (r.category_id IS NOT NULL AND r.category_id = ?) \
             ORDER BY r.shared_tags DESC, COALESCE(r.published_at, r.created_at) DESC, r.id DESC \
             LIMIT ?"
        );
        sqlx::query_as::<_, RelatedBlog>(&sql)
            .bind(blog.id)
            .bind(BlogStatus::Published)
            .bind(blog.id)
            .bind(blog.category_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load related blogs", e)
            })
    }
}

fn map_write_error(err: sqlx::Error, slug: &str, context: &str) -> AppError {
    if is_unique_violation(&err, "blogs.slug") {
        return AppError::conflict(format!("Slug '{slug}' is already in use"));
    }
    let foreign_key = matches!(&err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation());
    if foreign_key {
        AppError::validation("Category does not exist")
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
