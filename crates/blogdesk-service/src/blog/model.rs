//! Service-level inputs and outputs for blog operations.

use serde::{Deserialize, Serialize};

use blogdesk_entity::blog::{BlogListing, BlogStatus};
use blogdesk_entity::tag::BlogTag;

/// A tag reference embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<BlogTag> for TagRef {
    fn from(tag: BlogTag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// A post with everything a reader needs to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDetails {
    pub listing: BlogListing,
    pub tags: Vec<TagRef>,
}

/// Raw list parameters as received from the query string.
#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    pub search: Option<String>,
    /// `draft`, `published`, `archived`, or `all`. Defaults to `published`.
    pub status: Option<String>,
    /// Category id or slug.
    pub category: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
    /// Author user id.
    pub author: Option<i64>,
    pub featured: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct CreateBlogInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<BlogStatus>,
    pub is_featured: Option<bool>,
    pub allow_comments: Option<bool>,
}

/// Partial update of a post. `None` keeps the stored value; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<Option<String>>,
    pub meta_title: Option<Option<String>>,
    pub meta_description: Option<Option<String>>,
    pub status: Option<BlogStatus>,
    pub is_featured: Option<bool>,
    pub allow_comments: Option<bool>,
}
