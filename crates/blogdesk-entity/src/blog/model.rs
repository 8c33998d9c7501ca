//! Blog post models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::BlogStatus;

/// A blog post row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: i64,
    /// Owning author.
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    /// Unique URL identifier.
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: BlogStatus,
    pub is_featured: bool,
    pub allow_comments: bool,
    /// Monotonic view counter.
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set on first publication, never cleared.
    pub published_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Whether `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// A post joined with its author, category, and comment count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub blog: Blog,
    pub author_name: String,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub comments_count: i64,
}

/// A related post with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RelatedBlog {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: BlogListing,
    /// Number of tags shared with the reference post.
    pub shared_tags: i64,
}

/// Fully resolved column values for an insert or update.
///
/// The service layer merges partial input with the stored row before
/// handing this to the repository, so every field is concrete here.
#[derive(Debug, Clone)]
pub struct BlogWrite {
    pub category_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: BlogStatus,
    pub is_featured: bool,
    pub allow_comments: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&Blog> for BlogWrite {
    fn from(blog: &Blog) -> Self {
        Self {
            category_id: blog.category_id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            excerpt: blog.excerpt.clone(),
            content: blog.content.clone(),
            featured_image: blog.featured_image.clone(),
            meta_title: blog.meta_title.clone(),
            meta_description: blog.meta_description.clone(),
            status: blog.status,
            is_featured: blog.is_featured,
            allow_comments: blog.allow_comments,
            published_at: blog.published_at,
        }
    }
}
