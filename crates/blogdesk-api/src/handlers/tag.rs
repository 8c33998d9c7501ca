//! Tag handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use blogdesk_entity::tag::TagWithCount;

use crate::dto::request::{TaxonomyRequest, TaxonomyUpdateRequest};
use crate::dto::response::{ApiResponse, IdResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/blogs/tags
pub async fn list_tags(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<TagWithCount>>>> {
    let tags = state.tag_service.list().await?;
    Ok(Json(ApiResponse::ok(tags)))
}

/// GET /api/blogs/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<TagWithCount>>> {
    let tag = state.tag_service.get(&id).await?;
    Ok(Json(ApiResponse::ok(tag)))
}

/// POST /api/blogs/tags
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TaxonomyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TagWithCount>>)> {
    let tag = state.tag_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tag))))
}

/// PUT /api/blogs/tags/{id}
pub async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<TaxonomyUpdateRequest>,
) -> ApiResult<Json<ApiResponse<TagWithCount>>> {
    let tag = state
        .tag_service
        .update(&auth, &id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(tag)))
}

/// DELETE /api/blogs/tags/{id}
pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<IdResponse>>> {
    let id = state.tag_service.delete(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(IdResponse { id })))
}
