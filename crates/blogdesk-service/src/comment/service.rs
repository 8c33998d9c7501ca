//! Comment service.

use std::sync::Arc;

use tracing::info;

use blogdesk_auth::rbac::{Permission, RbacEnforcer};
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_database::repositories::{BlogRepository, CommentRepository};
use blogdesk_entity::comment::CommentWithUser;

use crate::blog::lookup::find_visible_blog;
use crate::context::RequestContext;

/// Maximum comment length in characters, after trimming.
pub const MAX_COMMENT_LENGTH: usize = 5000;

/// Lists, writes, and moderates comments.
#[derive(Debug, Clone)]
pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    blog_repo: Arc<BlogRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(
        comment_repo: Arc<CommentRepository>,
        blog_repo: Arc<BlogRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            comment_repo,
            blog_repo,
            rbac,
        }
    }

    /// Comments on a visible post, oldest first.
    pub async fn list(
        &self,
        ctx: Option<&RequestContext>,
        blog_id_or_slug: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentWithUser>> {
        let blog = find_visible_blog(&self.blog_repo, blog_id_or_slug, ctx).await?;
        self.comment_repo.list_for_blog(blog.id, page).await
    }

    /// Adds a comment to a visible post that accepts comments.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        blog_id_or_slug: &str,
        content: &str,
    ) -> AppResult<CommentWithUser> {
        let blog = find_visible_blog(&self.blog_repo, blog_id_or_slug, Some(ctx)).await?;
        if !blog.allow_comments {
            return Err(AppError::forbidden("Comments are disabled for this post"));
        }
        let content = validate_content(content)?;

        let comment = self
            .comment_repo
            .create(blog.id, ctx.user_id, &content)
            .await?;
        info!(user_id = ctx.user_id, blog_id = blog.id, comment_id = comment.id, "Comment created");

        self.comment_repo
            .find_with_user(comment.id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// Deletes a comment. Allowed for its writer, the post's author, and moderators.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        blog_id_or_slug: &str,
        comment_id: i64,
    ) -> AppResult<i64> {
        let blog = find_visible_blog(&self.blog_repo, blog_id_or_slug, Some(ctx)).await?;
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.blog_id == blog.id)
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        let allowed = comment.user_id == ctx.user_id
            || blog.is_owned_by(ctx.user_id)
            || self
                .rbac
                .has_permission(&ctx.role, &Permission::ModerateComments);
        if !allowed {
            return Err(AppError::forbidden("You can only delete your own comments"));
        }

        self.comment_repo.delete(comment.id).await?;
        info!(user_id = ctx.user_id, blog_id = blog.id, comment_id = comment.id, "Comment deleted");
        Ok(comment.id)
    }
}

fn validate_content(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("Comment content is required"));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(content.to_string())
}
