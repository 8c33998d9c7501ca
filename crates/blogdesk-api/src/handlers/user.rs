//! User self-service handlers.

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use blogdesk_core::types::pagination::PageResponse;
use blogdesk_service::user::UserStats;

use crate::dto::request::{DeleteAccountRequest, UpdateProfileRequest};
use crate::dto::response::{ApiResponse, MessageResponse, UserCommentResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{ApiQuery, AuthUser, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.update_profile(&auth, req.into()).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /api/users/stats
pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserStats>>> {
    let stats = state.user_service.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/users/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(paging): ApiQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<UserCommentResponse>>>> {
    let page = paging.into_page_request();
    let comments = state.user_service.comments(&auth, &page).await?;
    Ok(Json(ApiResponse::ok(comments.map(UserCommentResponse::from))))
}

/// DELETE /api/users/account
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<DeleteAccountRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.user_service.delete_account(&auth, &req.password).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Account deleted"))))
}

/// GET /api/users/export
///
/// Served as a file download rather than inside the envelope.
pub async fn export_data(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let export = state.user_service.export(&auth).await?;
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"user-data.json\"",
        )],
        Json(export),
    ))
}
