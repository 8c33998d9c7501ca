//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_entity::blog::BlogStatus;
use blogdesk_entity::user::UpdateProfile;
use blogdesk_service::auth::RegisterInput;
use blogdesk_service::blog::{CreateBlogInput, UpdateBlogInput};
use blogdesk_service::taxonomy::{TaxonomyInput, TaxonomyUpdate};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Update profile request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    #[validate(length(max = 500))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 255))]
    pub website: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            avatar_url: req.avatar_url,
            website: req.website,
            location: req.location,
        }
    }
}

/// Account deletion request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Tags as a JSON array or a comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Csv(String),
}

impl TagList {
    /// Trimmed, non-empty tag names.
    pub fn into_names(self) -> Vec<String> {
        let names = match self {
            Self::List(names) => names,
            Self::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

fn parse_status(raw: Option<String>) -> AppResult<Option<BlogStatus>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<BlogStatus>())
        .transpose()
}

/// Create post request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub excerpt: Option<String>,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<TagList>,
    #[validate(length(max = 500))]
    pub featured_image: Option<String>,
    #[validate(length(max = 255))]
    pub meta_title: Option<String>,
    #[validate(length(max = 500))]
    pub meta_description: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub allow_comments: Option<bool>,
}

impl CreateBlogRequest {
    /// Converts into the service input, parsing the status.
    pub fn into_input(self) -> AppResult<CreateBlogInput> {
        Ok(CreateBlogInput {
            status: parse_status(self.status)?,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            slug: self.slug,
            category_id: self.category_id,
            tags: self.tags.map(TagList::into_names).unwrap_or_default(),
            featured_image: self.featured_image,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            is_featured: self.is_featured,
            allow_comments: self.allow_comments,
        })
    }
}

/// Partial post update. Nullable columns accept an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub excerpt: Option<String>,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<i64>>,
    pub tags: Option<TagList>,
    #[serde(default, deserialize_with = "nullable")]
    pub featured_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub meta_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub meta_description: Option<Option<String>>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub allow_comments: Option<bool>,
}

impl UpdateBlogRequest {
    /// Converts into the service input, parsing the status.
    pub fn into_input(self) -> AppResult<UpdateBlogInput> {
        Ok(UpdateBlogInput {
            status: parse_status(self.status)?,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            slug: self.slug,
            category_id: self.category_id,
            tags: self.tags.map(TagList::into_names),
            featured_image: self.featured_image,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            is_featured: self.is_featured,
            allow_comments: self.allow_comments,
        })
    }
}

/// Create category or tag request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaxonomyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl From<TaxonomyRequest> for TaxonomyInput {
    fn from(req: TaxonomyRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
        }
    }
}

/// Partial category or tag update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaxonomyUpdateRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl From<TaxonomyUpdateRequest> for TaxonomyUpdate {
    fn from(req: TaxonomyUpdateRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
        }
    }
}

/// New comment body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}

/// Query parameters for the post list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub featured: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl BlogListQuery {
    /// Author filter as a user id. Blank means no filter.
    pub fn author_id(&self) -> AppResult<Option<i64>> {
        match self.author.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("Invalid author id: '{raw}'"))),
        }
    }

    /// `true`/`1` and `false`/`0`; anything else means no filter.
    pub fn featured_flag(&self) -> Option<bool> {
        match self.featured.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Some(true),
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Some(false),
            _ => None,
        }
    }
}

/// Query parameters for `/blogs/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query parameters for `/blogs/{id}/related`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<String>,
}

impl RelatedQuery {
    /// Requested limit; unparsable values fall back to the default.
    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|l| l.trim().parse().ok())
    }
}
