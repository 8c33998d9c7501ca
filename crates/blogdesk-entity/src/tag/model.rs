//! Tag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A free-form label attached to posts (many-to-many).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag with the number of published posts carrying it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub tag: Tag,
    pub posts_count: i64,
}

/// A tag link row, used to attach tags to a batch of posts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogTag {
    pub blog_id: i64,
    pub id: i64,
    pub name: String,
    pub slug: String,
}
