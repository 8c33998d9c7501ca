//! User self-service operations: profile, statistics, export, and account deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use blogdesk_auth::password::PasswordHasher;
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_database::repositories::{
    BlogRepository, CommentRepository, StatsRepository, UserRepository,
};
use blogdesk_entity::blog::Blog;
use blogdesk_entity::comment::CommentWithBlog;
use blogdesk_entity::user::{UpdateProfile, User};

use crate::context::RequestContext;

/// The caller's most viewed post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub views: i64,
}

/// Per-user writing and engagement statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_views: i64,
    pub total_comments_received: i64,
    pub total_comments_written: i64,
    pub member_since: DateTime<Utc>,
    pub top_post: Option<TopPost>,
}

/// Everything BlogDesk stores about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExport {
    pub exported_at: DateTime<Utc>,
    pub profile: User,
    pub posts: Vec<Blog>,
    pub comments: Vec<CommentWithBlog>,
}

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    blog_repo: Arc<BlogRepository>,
    comment_repo: Arc<CommentRepository>,
    stats_repo: Arc<StatsRepository>,
    hasher: Arc<PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        blog_repo: Arc<BlogRepository>,
        comment_repo: Arc<CommentRepository>,
        stats_repo: Arc<StatsRepository>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            blog_repo,
            comment_repo,
            stats_repo,
            hasher,
        }
    }

    /// Gets the current user's full profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    pub async fn update_profile(&self, ctx: &RequestContext, mut req: UpdateProfile) -> AppResult<User> {
        if let Some(name) = req.name.as_mut() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation("Name cannot be empty"));
            }
            *name = trimmed.to_string();
        }

        if req.is_empty() {
            return self.get_profile(ctx).await;
        }

        let user = self.user_repo.update_profile(ctx.user_id, &req).await?;
        info!(user_id = ctx.user_id, "Profile updated");
        Ok(user)
    }

    /// Aggregates the caller's posts, views, and comments.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<UserStats> {
        let user = self.get_profile(ctx).await?;
        let activity = self.stats_repo.user_activity(ctx.user_id).await?;
        let top_post = self.stats_repo.top_post(ctx.user_id).await?.map(|b| TopPost {
            id: b.id,
            title: b.title,
            slug: b.slug,
            views: b.views,
        });

        Ok(UserStats {
            total_posts: activity.total_posts,
            published_posts: activity.published_posts,
            draft_posts: activity.draft_posts,
            total_views: activity.total_views,
            total_comments_received: activity.total_comments_received,
            total_comments_written: activity.total_comments_written,
            member_since: user.created_at,
            top_post,
        })
    }

    /// Lists the caller's comments, newest first.
    pub async fn comments(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentWithBlog>> {
        self.comment_repo.list_for_user(ctx.user_id, page).await
    }

    /// Deletes the caller's account after re-checking the password.
    pub async fn delete_account(&self, ctx: &RequestContext, password: &str) -> AppResult<()> {
        let user = self.get_profile(ctx).await?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Password is incorrect"));
        }

        self.user_repo.delete(user.id).await?;
        info!(user_id = user.id, "Account deleted");
        Ok(())
    }

    /// Collects the caller's profile, posts, and comments.
    pub async fn export(&self, ctx: &RequestContext) -> AppResult<UserExport> {
        let profile = self.get_profile(ctx).await?;
        let posts = self.blog_repo.find_all_by_user(ctx.user_id).await?;
        let comments = self.comment_repo.find_all_by_user(ctx.user_id).await?;

        info!(user_id = ctx.user_id, posts = posts.len(), comments = comments.len(), "Data exported");
        Ok(UserExport {
            exported_at: Utc::now(),
            profile,
            posts,
            comments,
        })
    }
}
