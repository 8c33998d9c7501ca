//! Comment handlers nested under a post.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use blogdesk_core::types::pagination::PageResponse;

use crate::dto::request::CreateCommentRequest;
use crate::dto::response::{ApiResponse, CommentResponse, IdResponse};
use crate::error::ApiResult;
use crate::extractors::path::parse_id;
use crate::extractors::{ApiQuery, AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/blogs/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<String>,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<CommentResponse>>>> {
    let page = paging.into_page_request();
    let comments = state
        .comment_service
        .list(auth.as_ref().map(AuthUser::context), &id, &page)
        .await?;
    Ok(Json(ApiResponse::ok(comments.map(CommentResponse::from))))
}

/// POST /api/blogs/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CommentResponse>>)> {
    let comment = state
        .comment_service
        .create(&auth, &id, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment.into()))))
}

/// DELETE /api/blogs/{id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<ApiResponse<IdResponse>>> {
    let comment_id = parse_id(&comment_id)?;
    let id = state
        .comment_service
        .delete(&auth, &id, comment_id)
        .await?;
    Ok(Json(ApiResponse::ok(IdResponse { id })))
}
