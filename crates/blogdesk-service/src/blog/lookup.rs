//! Post resolution and visibility rules shared by blog and comment services.

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_database::repositories::BlogRepository;
use blogdesk_entity::blog::Blog;

use crate::context::RequestContext;
use crate::slugs::slug_key;

/// Find a post by numeric id, falling back to slug lookup.
///
/// All-digit slugs are legal, so a numeric identifier that matches no id
/// is retried as a slug.
pub async fn find_blog(repo: &BlogRepository, id_or_slug: &str) -> AppResult<Blog> {
    let key = id_or_slug.trim();
    if let Ok(id) = key.parse::<i64>() {
        if let Some(blog) = repo.find_by_id(id).await? {
            return Ok(blog);
        }
    }
    let found = match slug_key(key) {
        Some(slug) => repo.find_by_slug(&slug).await?,
        None => None,
    };
    found.ok_or_else(|| AppError::not_found("Blog not found"))
}

/// Published posts are public; others only to their author and admins.
pub fn can_view(blog: &Blog, ctx: Option<&RequestContext>) -> bool {
    blog.status.is_public()
        || ctx.is_some_and(|c| c.is_admin() || blog.is_owned_by(c.user_id))
}

/// Find a post the caller may see. Hidden posts read as missing.
pub async fn find_visible_blog(
    repo: &BlogRepository,
    id_or_slug: &str,
    ctx: Option<&RequestContext>,
) -> AppResult<Blog> {
    let blog = find_blog(repo, id_or_slug).await?;
    if can_view(&blog, ctx) {
        Ok(blog)
    } else {
        Err(AppError::not_found("Blog not found"))
    }
}
