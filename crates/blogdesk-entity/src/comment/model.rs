//! Comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A reader comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub blog_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment joined with its author's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub user_name: String,
}

/// A comment joined with the post it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithBlog {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub blog_title: String,
    pub blog_slug: String,
}
