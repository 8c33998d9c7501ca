//! Tag service.

use std::sync::Arc;

use tracing::info;

use blogdesk_auth::rbac::{Permission, RbacEnforcer};
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_database::repositories::TagRepository;
use blogdesk_entity::tag::{Tag, TagWithCount};

use super::{TaxonomyInput, TaxonomyUpdate, clean_description, validate_name};
use crate::context::RequestContext;
use crate::slugs::{SlugSource, slug_key};

/// Reads tags and lets admins curate them.
#[derive(Debug, Clone)]
pub struct TagService {
    tag_repo: Arc<TagRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(tag_repo: Arc<TagRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { tag_repo, rbac }
    }

    pub async fn list(&self) -> AppResult<Vec<TagWithCount>> {
        self.tag_repo.list_with_counts().await
    }

    pub async fn get(&self, id_or_slug: &str) -> AppResult<TagWithCount> {
        let tag = self.find(id_or_slug).await?;
        self.with_count(tag.id).await
    }

    /// Creates a tag.
    pub async fn create(&self, ctx: &RequestContext, input: TaxonomyInput) -> AppResult<TagWithCount> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;

        let name = validate_name(&input.name)?;
        let slug = self
            .pick_slug(&SlugSource::new(input.slug.as_deref(), &name), None)
            .await?;
        let description = clean_description(input.description);

        let tag = self
            .tag_repo
            .create(&name, &slug, description.as_deref())
            .await?;
        info!(user_id = ctx.user_id, tag_id = tag.id, slug = %tag.slug, "Tag created");
        self.with_count(tag.id).await
    }

    /// Renames or re-describes a tag.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id_or_slug: &str,
        input: TaxonomyUpdate,
    ) -> AppResult<TagWithCount> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;
        let tag = self.find(id_or_slug).await?;

        let name = match input.name {
            Some(name) => validate_name(&name)?,
            None => tag.name.clone(),
        };
        let explicit = input.slug.as_deref().filter(|s| !s.trim().is_empty());
        let slug = if explicit.is_some() || name != tag.name {
            self.pick_slug(&SlugSource::new(explicit, &name), Some(tag.id))
                .await?
        } else {
            tag.slug.clone()
        };
        let description = match input.description {
            Some(description) => clean_description(description),
            None => tag.description.clone(),
        };

        let updated = self
            .tag_repo
            .update(tag.id, &name, &slug, description.as_deref())
            .await?;
        info!(user_id = ctx.user_id, tag_id = updated.id, slug = %updated.slug, "Tag updated");
        self.with_count(updated.id).await
    }

    /// Deletes a tag and unlinks it from every post. Returns its id.
    pub async fn delete(&self, ctx: &RequestContext, id_or_slug: &str) -> AppResult<i64> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;
        let tag = self.find(id_or_slug).await?;

        self.tag_repo.delete(tag.id).await?;
        info!(user_id = ctx.user_id, tag_id = tag.id, "Tag deleted");
        Ok(tag.id)
    }

    async fn find(&self, id_or_slug: &str) -> AppResult<Tag> {
        let key = id_or_slug.trim();
        let found = match key.parse::<i64>() {
            Ok(id) => self.tag_repo.find_by_id(id).await?,
            Err(_) => None,
        };
        if let Some(tag) = found {
            return Ok(tag);
        }
        let found = match slug_key(key) {
            Some(slug) => self.tag_repo.find_by_slug(&slug).await?,
            None => None,
        };
        found.ok_or_else(|| AppError::not_found("Tag not found"))
    }

    async fn with_count(&self, id: i64) -> AppResult<TagWithCount> {
        self.tag_repo
            .find_with_count(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))
    }

    async fn pick_slug(&self, source: &SlugSource<'_>, exclude_id: Option<i64>) -> AppResult<String> {
        let base = source.base()?;
        let taken = self
            .tag_repo
            .slugs_like(SlugSource::family(&base), exclude_id)
            .await?;
        source.resolve(&base, &taken, &[])
    }
}
