//! Media upload handler.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use bytes::Bytes;

use blogdesk_core::error::AppError;
use blogdesk_service::upload::UploadedFile;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(err.body_text())
    } else {
        AppError::bad_request(format!("Multipart error: {}", err.body_text()))
    }
}

/// POST /api/upload (alias POST /api/blogs/upload)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<UploadedFile>>> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(multipart_error)?;
        file = Some((file_name, content_type, data));
        break;
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::bad_request("No file uploaded"))?;

    let stored = state
        .upload_service
        .store(&auth, &file_name, content_type.as_deref(), data)
        .await?;
    Ok(Json(ApiResponse::ok(stored)))
}
