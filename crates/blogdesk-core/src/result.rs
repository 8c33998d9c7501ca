//! Convenience result type alias for BlogDesk.

use crate::error::AppError;

/// A specialized `Result` type for BlogDesk operations.
pub type AppResult<T> = Result<T, AppError>;
