//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PER_PAGE: u64 = 10;
/// Maximum page size.
pub const MAX_PER_PAGE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

impl PageRequest {
    /// Create a new page request, clamping both values into range.
    pub fn new(page: u64, per_page: u64) -> Self {
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page.min(MAX_PER_PAGE)
        };
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// Build a page request from raw query-string values.
    ///
    /// Non-numeric or non-positive input falls back to the defaults
    /// instead of failing the request. A page whose offset would not fit
    /// in an SQL integer is out of range and also reads as page 1.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        let per_page = per_page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| (p as u64).min(MAX_PER_PAGE))
            .unwrap_or(DEFAULT_PER_PAGE);
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p as u64)
            .filter(|p| Self::offset_for(*p, per_page).is_some())
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    /// Calculate the SQL `OFFSET` value, saturating at `i64::MAX`.
    pub fn offset(&self) -> i64 {
        Self::offset_for(self.page, self.per_page).unwrap_or(i64::MAX)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    fn offset_for(page: u64, per_page: u64) -> Option<i64> {
        page.saturating_sub(1)
            .checked_mul(per_page)
            .and_then(|offset| i64::try_from(offset).ok())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Pagination block attached to every paginated payload.
///
/// `current_page` and `limit` mirror `page` and `per_page` so that clients
/// written against either naming keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based).
    pub page: u64,
    /// Alias of `page`.
    pub current_page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Alias of `per_page`.
    pub limit: u64,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl Pagination {
    /// Compute the pagination block for a request and a total count.
    pub fn new(request: &PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(request.per_page)
        };
        Self {
            page: request.page,
            current_page: request.page,
            per_page: request.per_page,
            limit: request.per_page,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Page position and totals.
    pub pagination: Pagination,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    /// Create an empty response.
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Convert the items while keeping the pagination block.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
