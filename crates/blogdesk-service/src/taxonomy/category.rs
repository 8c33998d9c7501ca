//! Category service.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use blogdesk_auth::rbac::{Permission, RbacEnforcer};
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_database::repositories::CategoryRepository;
use blogdesk_entity::category::{Category, CategoryWithCount};

use super::{TaxonomyInput, TaxonomyUpdate, clean_description, validate_name};
use crate::context::RequestContext;
use crate::slugs::{SlugSource, slug_key};

/// Reads the category catalogue and lets admins curate it.
#[derive(Debug, Clone)]
pub struct CategoryService {
    category_repo: Arc<CategoryRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(category_repo: Arc<CategoryRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self {
            category_repo,
            rbac,
        }
    }

    /// All categories by name with published post counts.
    pub async fn list(&self) -> AppResult<Vec<CategoryWithCount>> {
        self.category_repo.list_with_counts().await
    }

    /// One category by id or slug.
    pub async fn get(&self, id_or_slug: &str) -> AppResult<CategoryWithCount> {
        let category = self.find(id_or_slug).await?;
        self.with_count(category.id).await
    }

    /// Creates a category.
    pub async fn create(&self, ctx: &RequestContext, input: TaxonomyInput) -> AppResult<CategoryWithCount> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;

        let name = validate_name(&input.name)?;
        let slug = self
            .pick_slug(&SlugSource::new(input.slug.as_deref(), &name), None)
            .await?;
        let description = clean_description(input.description);

        let category = self
            .category_repo
            .create(&name, &slug, description.as_deref())
            .await?;
        info!(user_id = ctx.user_id, category_id = category.id, slug = %category.slug, "Category created");
        self.with_count(category.id).await
    }

    /// Renames or re-describes a category.
    ///
    /// A name change regenerates the slug unless one is given explicitly.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id_or_slug: &str,
        input: TaxonomyUpdate,
    ) -> AppResult<CategoryWithCount> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;
        let category = self.find(id_or_slug).await?;

        let name = match input.name {
            Some(name) => validate_name(&name)?,
            None => category.name.clone(),
        };
        let explicit = input.slug.as_deref().filter(|s| !s.trim().is_empty());
        let slug = if explicit.is_some() || name != category.name {
            self.pick_slug(&SlugSource::new(explicit, &name), Some(category.id))
                .await?
        } else {
            category.slug.clone()
        };
        let description = match input.description {
            Some(description) => clean_description(description),
            None => category.description.clone(),
        };

        let updated = self
            .category_repo
            .update(category.id, &name, &slug, description.as_deref())
            .await?;
        info!(user_id = ctx.user_id, category_id = updated.id, slug = %updated.slug, "Category updated");
        self.with_count(updated.id).await
    }

    /// Deletes an empty category. Returns its id.
    pub async fn delete(&self, ctx: &RequestContext, id_or_slug: &str) -> AppResult<i64> {
        self.rbac
            .require_permission(&ctx.role, &Permission::ManageCatalogue)?;
        let category = self.find(id_or_slug).await?;

        let posts_count = self.category_repo.count_posts(category.id).await?;
        if posts_count > 0 {
            return Err(AppError::conflict(format!(
                "Category '{}' still has {posts_count} post(s)",
                category.name
            ))
            .with_details(json!({ "posts_count": posts_count })));
        }

        self.category_repo.delete(category.id).await?;
        info!(user_id = ctx.user_id, category_id = category.id, "Category deleted");
        Ok(category.id)
    }

    async fn find(&self, id_or_slug: &str) -> AppResult<Category> {
        let key = id_or_slug.trim();
        let found = match key.parse::<i64>() {
            Ok(id) => self.category_repo.find_by_id(id).await?,
            Err(_) => None,
        };
        if let Some(category) = found {
            return Ok(category);
        }
        let found = match slug_key(key) {
            Some(slug) => self.category_repo.find_by_slug(&slug).await?,
            None => None,
        };
        found.ok_or_else(|| AppError::not_found("Category not found"))
    }

    async fn with_count(&self, id: i64) -> AppResult<CategoryWithCount> {
        self.category_repo
            .find_with_count(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    async fn pick_slug(&self, source: &SlugSource<'_>, exclude_id: Option<i64>) -> AppResult<String> {
        let base = source.base()?;
        let taken = self
            .category_repo
            .slugs_like(SlugSource::family(&base), exclude_id)
            .await?;
        source.resolve(&base, &taken, &[])
    }
}
