//! Category catalogue handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use blogdesk_entity::category::CategoryWithCount;

use crate::dto::request::{TaxonomyRequest, TaxonomyUpdateRequest};
use crate::dto::response::{ApiResponse, IdResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/blogs/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<CategoryWithCount>>>> {
    let categories = state.category_service.list().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/blogs/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<CategoryWithCount>>> {
    let category = state.category_service.get(&id).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// POST /api/blogs/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TaxonomyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CategoryWithCount>>)> {
    let category = state.category_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// PUT /api/blogs/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<TaxonomyUpdateRequest>,
) -> ApiResult<Json<ApiResponse<CategoryWithCount>>> {
    let category = state
        .category_service
        .update(&auth, &id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// DELETE /api/blogs/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IdResponse>>> {
    let id = state.category_service.delete(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(IdResponse { id })))
}
