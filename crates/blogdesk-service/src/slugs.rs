//! Slug selection shared by blog, category, and tag writes.

use std::collections::HashSet;

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::slug::{base_slug, is_valid_slug, slug_base, slugify, unique_slug};
use serde_json::json;

/// Post slugs shadowed by fixed routes under `/api/blogs/`.
pub(crate) const RESERVED_BLOG_SLUGS: &[&str] = &["search", "my-blogs", "categories", "tags", "upload"];

/// What a write wants its slug derived from.
pub(crate) enum SlugSource<'a> {
    /// A caller-supplied slug. Must be free.
    Explicit(&'a str),
    /// A title or name. Disambiguated with a numeric suffix.
    Derived(&'a str),
}

impl<'a> SlugSource<'a> {
    /// Pick the source: a non-blank explicit slug wins over the title.
    pub(crate) fn new(explicit: Option<&'a str>, title: &'a str) -> Self {
        match explicit.filter(|s| !s.trim().is_empty()) {
            Some(slug) => Self::Explicit(slug),
            None => Self::Derived(title),
        }
    }

    /// The slug before disambiguation.
    pub(crate) fn base(&self) -> AppResult<String> {
        match self {
            Self::Explicit(raw) => {
                let slug = slugify(raw);
                if slug.is_empty() {
                    return Err(AppError::validation(format!("Invalid slug: '{raw}'")));
                }
                Ok(slug)
            }
            Self::Derived(text) => Ok(slug_base(text)),
        }
    }

    /// Prefix whose `-N` variants must be loaded before resolving `base`.
    ///
    /// Covers `base` itself and every suffixed sibling, so a suggestion for a
    /// taken `post-2` can be drawn from the `post` family.
    pub(crate) fn family(base: &str) -> &str {
        base_slug(base)
    }

    /// Resolve the final slug given the slugs already taken around `base`.
    ///
    /// `reserved` slugs count as taken for derived slugs and are refused
    /// outright when supplied explicitly.
    pub(crate) fn resolve(
        &self,
        base: &str,
        taken: &HashSet<String>,
        reserved: &[&str],
    ) -> AppResult<String> {
        let mut blocked = taken.clone();
        blocked.extend(reserved.iter().map(|s| s.to_string()));

        match self {
            Self::Explicit(_) if reserved.contains(&base) => {
                Err(AppError::validation(format!("Slug '{base}' is reserved")))
            }
            Self::Explicit(_) if taken.contains(base) => {
                let suggestion = unique_slug(Self::family(base), &blocked);
                Err(AppError::conflict(format!("Slug '{base}' is already in use"))
                    .with_details(json!({ "suggestion": suggestion })))
            }
            Self::Explicit(_) => Ok(base.to_string()),
            Self::Derived(_) => Ok(unique_slug(base, &blocked)),
        }
    }
}

/// Normalize a path identifier for slug lookup.
///
/// `None` when the key cannot be a stored slug, so the caller can answer
/// "not found" without a query.
pub(crate) fn slug_key(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    is_valid_slug(&key).then_some(key)
}
