//! Category and tag catalogue management.
//!
//! Both catalogues share one input shape and one set of name rules; only
//! deletion differs (categories refuse to drop posts, tags unlink them).

pub mod category;
pub mod tag;

pub use category::CategoryService;
pub use tag::TagService;

use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;

/// Maximum name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Input for creating a category or tag.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a category or tag. `Some(None)` clears the description.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
}

pub(crate) fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

pub(crate) fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"n".repeat(101)).is_err());
        assert_eq!(validate_name(" Rust ").unwrap(), "Rust");
    }

    #[test]
    fn test_blank_description_is_none() {
        assert_eq!(clean_description(Some("   ".into())), None);
        assert_eq!(clean_description(Some(" About ".into())).as_deref(), Some("About"));
    }
}
