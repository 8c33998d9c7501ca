//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use blogdesk_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
///
/// Values stay strings so that junk input falls back to defaults instead
/// of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based). Alias: `current_page`.
    pub page: Option<String>,
    pub current_page: Option<String>,
    /// Items per page (default 10, max 100). Alias: `limit`.
    pub per_page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    /// Converts to a `PageRequest`.
    pub fn into_page_request(self) -> PageRequest {
        PageRequest::from_query(
            self.page.as_deref().or(self.current_page.as_deref()),
            self.per_page.as_deref().or(self.limit.as_deref()),
        )
    }
}
