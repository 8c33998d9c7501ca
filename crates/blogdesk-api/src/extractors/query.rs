//! Query string extractor reporting errors in the API envelope.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use blogdesk_core::error::AppError;

use crate::error::ApiError;

/// `Query<T>` whose rejection is a 400 `BAD_REQUEST` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = <Query<T> as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid query string: {}", e.body_text())))?;
        Ok(Self(value))
    }
}
