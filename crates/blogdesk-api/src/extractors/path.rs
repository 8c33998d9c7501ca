//! Typed path parameter helpers.

use blogdesk_core::error::AppError;

/// Parses a numeric id from a path segment.
pub fn parse_id(s: &str) -> Result<i64, AppError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("Invalid id: {s}")))
}
