//! Sorting types for list endpoints.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a direction leniently. Anything other than `asc` is descending.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort specification consisting of a field name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Column or field name to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Resolve a requested field against an allow-list, falling back to
    /// `default_field` for unknown names.
    pub fn from_allowed(
        requested: Option<&str>,
        allowed: &[&str],
        default_field: &str,
        direction: SortDirection,
    ) -> Self {
        let field = requested
            .map(str::trim)
            .filter(|f| allowed.contains(f))
            .unwrap_or(default_field);
        Self::new(field, direction)
    }

    /// Render as `field:DIR`, used in list response metadata.
    pub fn describe(&self) -> String {
        format!("{}:{}", self.field, self.direction.as_sql())
    }
}
