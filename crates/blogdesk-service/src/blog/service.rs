//! Blog post service: listing, reading, writing, and publishing workflow.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use blogdesk_auth::rbac::{Permission, RbacEnforcer};
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::slug::slugify;
use blogdesk_core::types::pagination::{PageRequest, PageResponse};
use blogdesk_core::types::sorting::{SortDirection, SortField};
use blogdesk_database::repositories::blog::BLOG_SORT_FIELDS;
use blogdesk_database::repositories::{
    BlogFilter, BlogRepository, CategoryRepository, TagRepository,
};
use blogdesk_entity::blog::{Blog, BlogListing, BlogStatus, BlogWrite};

use super::lookup::{find_blog, find_visible_blog};
use super::model::{BlogDetails, BlogQuery, CreateBlogInput, TagRef, UpdateBlogInput};
use crate::context::RequestContext;
use crate::slugs::{RESERVED_BLOG_SLUGS, SlugSource};

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 255;
/// Default and maximum number of related posts.
pub const DEFAULT_RELATED_LIMIT: i64 = 6;
const MAX_RELATED_LIMIT: i64 = 20;
/// Length of an excerpt derived from content.
const DERIVED_EXCERPT_CHARS: usize = 200;

/// Orchestrates blog repositories, tag resolution, and ownership checks.
#[derive(Debug, Clone)]
pub struct BlogService {
    blog_repo: Arc<BlogRepository>,
    category_repo: Arc<CategoryRepository>,
    tag_repo: Arc<TagRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl BlogService {
    /// Creates a new blog service.
    pub fn new(
        blog_repo: Arc<BlogRepository>,
        category_repo: Arc<CategoryRepository>,
        tag_repo: Arc<TagRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            blog_repo,
            category_repo,
            tag_repo,
            rbac,
        }
    }

    /// Lists posts with filters, sorting, and visibility rules applied.
    ///
    /// Returns the page together with the effective sort.
    pub async fn list(
        &self,
        ctx: Option<&RequestContext>,
        query: BlogQuery,
        page: &PageRequest,
    ) -> AppResult<(PageResponse<BlogDetails>, SortField)> {
        let sort = resolve_sort(query.sort_by.as_deref(), query.sort_order.as_deref());
        let status = parse_status_filter(query.status.as_deref(), Some(BlogStatus::Published))?;

        let mut filter = BlogFilter {
            search: query.search,
            status,
            author_id: query.author,
            category: query.category,
            tag: query.tag,
            featured: query.featured,
        };

        if status != Some(BlogStatus::Published) {
            let ctx = ctx.ok_or_else(|| {
                AppError::unauthorized("Authentication required to list unpublished posts")
            })?;
            if !ctx.is_admin() {
                if filter.author_id.is_some_and(|a| a != ctx.user_id) {
                    return Ok((PageResponse::empty(page), sort));
                }
                filter.author_id = Some(ctx.user_id);
            }
        }

        let listings = self.blog_repo.list(&filter, &sort, page).await?;
        Ok((self.attach_tags_page(listings).await?, sort))
    }

    /// Full-text search over published posts.
    pub async fn search(
        &self,
        term: &str,
        page: &PageRequest,
    ) -> AppResult<(PageResponse<BlogDetails>, SortField)> {
        let query = BlogQuery {
            search: Some(term.to_string()),
            ..BlogQuery::default()
        };
        self.list(None, query, page).await
    }

    /// Lists the caller's own posts of every status.
    pub async fn mine(
        &self,
        ctx: &RequestContext,
        query: BlogQuery,
        page: &PageRequest,
    ) -> AppResult<(PageResponse<BlogDetails>, SortField)> {
        let sort = resolve_sort(query.sort_by.as_deref(), query.sort_order.as_deref());
        let filter = BlogFilter {
            search: query.search,
            status: parse_status_filter(query.status.as_deref(), None)?,
            author_id: Some(ctx.user_id),
            category: query.category,
            tag: query.tag,
            featured: query.featured,
        };
        let listings = self.blog_repo.list(&filter, &sort, page).await?;
        Ok((self.attach_tags_page(listings).await?, sort))
    }

    /// Reads one post by id or slug.
    pub async fn get(&self, ctx: Option<&RequestContext>, id_or_slug: &str) -> AppResult<BlogDetails> {
        let blog = find_visible_blog(&self.blog_repo, id_or_slug, ctx).await?;
        self.details(blog.id).await
    }

    /// Creates a post owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: CreateBlogInput) -> AppResult<BlogDetails> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageOwnPosts)?;

        let title = validate_title(&input.title)?;
        let content = validate_content(&input.content)?;
        self.ensure_category(input.category_id).await?;

        let source = SlugSource::new(input.slug.as_deref(), &title);
        let slug = self.pick_slug(&source, None).await?;
        let tag_ids = self.resolve_tags(&input.tags).await?;

        let status = input.status.unwrap_or_default();
        let data = BlogWrite {
            category_id: input.category_id,
            excerpt: resolve_excerpt(input.excerpt, &content),
            title,
            slug,
            content,
            featured_image: non_blank(input.featured_image),
            meta_title: non_blank(input.meta_title),
            meta_description: non_blank(input.meta_description),
            status,
            is_featured: input.is_featured.unwrap_or(false),
            allow_comments: input.allow_comments.unwrap_or(true),
            published_at: status.is_public().then(Utc::now),
        };

        let blog = self.blog_repo.create(ctx.user_id, &data, &tag_ids).await?;
        info!(user_id = ctx.user_id, blog_id = blog.id, slug = %blog.slug, status = %blog.status, "Blog created");
        self.details(blog.id).await
    }

    /// Applies a partial update to a post the caller may manage.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id_or_slug: &str,
        input: UpdateBlogInput,
    ) -> AppResult<BlogDetails> {
        let blog = self.find_manageable(ctx, id_or_slug).await?;
        let mut data = BlogWrite::from(&blog);

        let title_changed = match input.title {
            Some(title) => {
                let title = validate_title(&title)?;
                let changed = title != blog.title;
                data.title = title;
                changed
            }
            None => false,
        };
        if let Some(content) = input.content {
            let content = validate_content(&content)?;
            // An excerpt derived from the old content follows the new one.
            if input.excerpt.is_none() && blog.excerpt == resolve_excerpt(None, &blog.content) {
                data.excerpt = resolve_excerpt(None, &content);
            }
            data.content = content;
        }
        if let Some(excerpt) = input.excerpt {
            data.excerpt = resolve_excerpt(Some(excerpt), &data.content);
        }
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
            data.category_id = category_id;
        }
        if let Some(featured_image) = input.featured_image {
            data.featured_image = non_blank(featured_image);
        }
        if let Some(meta_title) = input.meta_title {
            data.meta_title = non_blank(meta_title);
        }
        if let Some(meta_description) = input.meta_description {
            data.meta_description = non_blank(meta_description);
        }
        if let Some(is_featured) = input.is_featured {
            data.is_featured = is_featured;
        }
        if let Some(allow_comments) = input.allow_comments {
            data.allow_comments = allow_comments;
        }
        if let Some(status) = input.status {
            data.status = status;
            if status.is_public() && data.published_at.is_none() {
                data.published_at = Some(Utc::now());
            }
        }

        let explicit = input.slug.as_deref().filter(|s| !s.trim().is_empty());
        if explicit.is_some() || title_changed {
            let source = SlugSource::new(explicit, &data.title);
            data.slug = self.pick_slug(&source, Some(blog.id)).await?;
        }

        let tag_ids = match input.tags {
            Some(names) => Some(self.resolve_tags(&names).await?),
            None => None,
        };

        let updated = self.blog_repo.update(blog.id, &data, tag_ids.as_deref()).await?;
        info!(user_id = ctx.user_id, blog_id = updated.id, slug = %updated.slug, "Blog updated");
        self.details(updated.id).await
    }

    /// Deletes a post the caller may manage. Returns its id.
    pub async fn delete(&self, ctx: &RequestContext, id_or_slug: &str) -> AppResult<i64> {
        let blog = self.find_manageable(ctx, id_or_slug).await?;
        self.blog_repo.delete(blog.id).await?;
        info!(user_id = ctx.user_id, blog_id = blog.id, "Blog deleted");
        Ok(blog.id)
    }

    /// Moves a post to `target` status. Same-status transitions are no-ops.
    pub async fn transition(
        &self,
        ctx: &RequestContext,
        id_or_slug: &str,
        target: BlogStatus,
    ) -> AppResult<BlogDetails> {
        let blog = self.find_manageable(ctx, id_or_slug).await?;
        if blog.status == target {
            return self.details(blog.id).await;
        }

        let published_at = target.is_public().then(Utc::now);
        let updated = self.blog_repo.set_status(blog.id, target, published_at).await?;
        info!(
            user_id = ctx.user_id,
            blog_id = updated.id,
            from = %blog.status,
            to = %updated.status,
            "Blog status changed"
        );
        self.details(updated.id).await
    }

    /// Counts one view of a visible post and returns the new total.
    pub async fn record_view(&self, ctx: Option<&RequestContext>, id_or_slug: &str) -> AppResult<i64> {
        let blog = find_visible_blog(&self.blog_repo, id_or_slug, ctx).await?;
        self.blog_repo.increment_views(blog.id).await
    }

    /// Published posts related to a visible post by category or tags.
    pub async fn related(
        &self,
        ctx: Option<&RequestContext>,
        id_or_slug: &str,
        limit: Option<i64>,
    ) -> AppResult<(Vec<BlogDetails>, i64)> {
        let limit = clamp_related_limit(limit);
        let blog = find_visible_blog(&self.blog_repo, id_or_slug, ctx).await?;
        let related = self.blog_repo.related(&blog, limit).await?;
        let listings = related.into_iter().map(|r| r.listing).collect();
        Ok((self.attach_tags(listings).await?, limit))
    }

    async fn find_manageable(&self, ctx: &RequestContext, id_or_slug: &str) -> AppResult<Blog> {
        let blog = find_blog(&self.blog_repo, id_or_slug).await?;
        self.rbac.require_owner_or(
            &ctx.role,
            ctx.user_id,
            blog.user_id,
            Permission::ManageOwnPosts,
            Permission::ManageAnyPost,
            "You can only modify your own posts",
        )?;
        Ok(blog)
    }

    async fn details(&self, blog_id: i64) -> AppResult<BlogDetails> {
        let listing = self
            .blog_repo
            .find_listing(blog_id)
            .await?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;
        let tags = self
            .blog_repo
            .tags_for(&[blog_id])
            .await?
            .into_iter()
            .map(TagRef::from)
            .collect();
        Ok(BlogDetails { listing, tags })
    }

    async fn attach_tags(&self, listings: Vec<BlogListing>) -> AppResult<Vec<BlogDetails>> {
        let ids: Vec<i64> = listings.iter().map(|l| l.blog.id).collect();
        let mut by_blog: HashMap<i64, Vec<TagRef>> = HashMap::new();
        for tag in self.blog_repo.tags_for(&ids).await? {
            by_blog.entry(tag.blog_id).or_default().push(TagRef::from(tag));
        }
        Ok(listings
            .into_iter()
            .map(|listing| {
                let tags = by_blog.remove(&listing.blog.id).unwrap_or_default();
                BlogDetails { listing, tags }
            })
            .collect())
    }

    async fn attach_tags_page(
        &self,
        page: PageResponse<BlogListing>,
    ) -> AppResult<PageResponse<BlogDetails>> {
        let items = self.attach_tags(page.items).await?;
        Ok(PageResponse {
            items,
            pagination: page.pagination,
        })
    }

    async fn ensure_category(&self, category_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = category_id {
            if self.category_repo.find_by_id(id).await?.is_none() {
                return Err(AppError::validation(format!("Category {id} does not exist")));
            }
        }
        Ok(())
    }

    async fn pick_slug(&self, source: &SlugSource<'_>, exclude_id: Option<i64>) -> AppResult<String> {
        let base = source.base()?;
        let taken = self
            .blog_repo
            .slugs_like(SlugSource::family(&base), exclude_id)
            .await?;
        source.resolve(&base, &taken, RESERVED_BLOG_SLUGS)
    }

    /// Find-or-create tags by slug, preserving first-seen order.
    async fn resolve_tags(&self, names: &[String]) -> AppResult<Vec<i64>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for name in names {
            let name = name.trim();
            let slug = slugify(name);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }
            let tag = self.tag_repo.find_or_create(name, &slug).await?;
            ids.push(tag.id);
        }
        Ok(ids)
    }
}

fn resolve_sort(sort_by: Option<&str>, sort_order: Option<&str>) -> SortField {
    SortField::from_allowed(
        sort_by,
        BLOG_SORT_FIELDS,
        "created_at",
        SortDirection::parse_lenient(sort_order),
    )
}

/// `None`/blank → `default`; `all` → no filter; otherwise a concrete status.
fn parse_status_filter(
    raw: Option<&str>,
    default: Option<BlogStatus>,
) -> AppResult<Option<BlogStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse::<BlogStatus>().map(Some),
    }
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> AppResult<String> {
    if content.trim().is_empty() {
        return Err(AppError::validation("Content is required"));
    }
    Ok(content.to_string())
}

/// Use the given excerpt, or derive one from the first words of `content`.
fn resolve_excerpt(excerpt: Option<String>, content: &str) -> String {
    if let Some(excerpt) = excerpt.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        return excerpt;
    }
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= DERIVED_EXCERPT_CHARS {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(DERIVED_EXCERPT_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > DERIVED_EXCERPT_CHARS / 2 => cut[..idx].to_string(),
        _ => cut,
    };
    format!("{cut}...")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clamp_related_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .clamp(1, MAX_RELATED_LIMIT)
}
