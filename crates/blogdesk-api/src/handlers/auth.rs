//! Auth handlers: register, login, refresh, logout, me, change-password.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, UserEnvelope};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserEnvelope>>)> {
    let user = state.auth_service.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserEnvelope { user: user.into() })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(result.tokens, result.user))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(LoginResponse::new(result.tokens, result.user))))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; clients drop them.
pub async fn logout() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::ok(MessageResponse::new("Logged out")))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserEnvelope>>> {
    let user = state.auth_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(UserEnvelope { user: user.into() })))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .auth_service
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed successfully",
    ))))
}
