//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blogdesk_auth::TokenPair;
use blogdesk_entity::blog::Blog;
use blogdesk_entity::comment::{CommentWithBlog, CommentWithUser};
use blogdesk_entity::user::{User, UserRole};
use blogdesk_service::blog::{BlogDetails, TagRef};

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data, `null` on failure.
    pub data: Option<T>,
    /// Error block, `null` on success.
    pub error: Option<ErrorBody>,
    /// Extra information about the payload (sorting, limits).
    pub meta: Option<serde_json::Value>,
}

/// Error block of a failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    pub details: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Creates a successful response with a `meta` block.
    pub fn with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            meta: Some(meta),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// Creates a failed response.
    pub fn failure(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
                details,
            }),
            meta: None,
        }
    }
}

/// Public user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            bio: user.bio,
            avatar_url: user.avatar_url,
            website: user.website,
            location: user.location,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// `{ user }` wrapper used by registration and `/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Login and refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
            user: user.into(),
        }
    }
}

/// `{ id, name }` of a post's author or a comment's writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub name: String,
}

/// `{ id, name, slug }` of a post's category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A post with its author, category, tags, and comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub tags: Vec<TagRef>,
    pub comments_count: i64,
}

impl From<BlogDetails> for BlogResponse {
    fn from(details: BlogDetails) -> Self {
        let listing = details.listing;
        let category = match (listing.blog.category_id, listing.category_name, listing.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategoryRef { id, name, slug }),
            _ => None,
        };
        Self {
            author: AuthorRef {
                id: listing.blog.user_id,
                name: listing.author_name,
            },
            category,
            tags: details.tags,
            comments_count: listing.comments_count,
            blog: listing.blog,
        }
    }
}

/// A comment with its writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub blog_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: AuthorRef,
}

impl From<CommentWithUser> for CommentResponse {
    fn from(row: CommentWithUser) -> Self {
        let c = row.comment;
        Self {
            id: c.id,
            blog_id: c.blog_id,
            user_id: c.user_id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
            user: AuthorRef {
                id: c.user_id,
                name: row.user_name,
            },
        }
    }
}

/// `{ id, title, slug }` of the post a comment was written on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogRef {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// One of the caller's own comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCommentResponse {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blog: BlogRef,
}

impl From<CommentWithBlog> for UserCommentResponse {
    fn from(row: CommentWithBlog) -> Self {
        let c = row.comment;
        Self {
            id: c.id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
            blog: BlogRef {
                id: c.blog_id,
                title: row.blog_title,
                slug: row.blog_slug,
            },
        }
    }
}

/// `{ items }` wrapper for unpaginated lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Id of a deleted resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i64,
}

/// View counter after an increment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewsResponse {
    pub views: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    pub version: String,
    pub time: DateTime<Utc>,
    /// `connected` or `unavailable`.
    pub database: String,
    pub uptime_seconds: i64,
}
