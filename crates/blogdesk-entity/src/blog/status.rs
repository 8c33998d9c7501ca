//! Blog publication status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    /// Work in progress, visible to its author and admins only.
    #[default]
    Draft,
    /// Publicly visible.
    Published,
    /// Retired from listings, visible to its author and admins only.
    Archived,
}

impl BlogStatus {
    /// All statuses in display order.
    pub const ALL: [BlogStatus; 3] = [Self::Draft, Self::Published, Self::Archived];

    /// Whether anonymous readers may see posts in this status.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Published)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BlogStatus {
    type Err = blogdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(blogdesk_core::AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: draft, published, archived"
            ))),
        }
    }
}
