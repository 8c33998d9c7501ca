//! Upload service: validates and stores media files.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use blogdesk_core::config::UploadConfig;
use blogdesk_core::error::AppError;
use blogdesk_core::result::AppResult;
use blogdesk_core::traits::storage::StorageProvider;
use blogdesk_storage::{extension_of, stored_filename};

use crate::context::RequestContext;

/// A stored upload as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Public URL under the configured prefix.
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub content_type: String,
}

/// Checks uploads against the configured limits and writes them to storage.
#[derive(Debug, Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageProvider>,
    config: UploadConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(storage: Arc<dyn StorageProvider>, config: UploadConfig) -> Self {
        Self { storage, config }
    }

    /// Upper bound on accepted file size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.config.max_file_size_bytes
    }

    /// Validates and stores one file.
    pub async fn store(
        &self,
        ctx: &RequestContext,
        original_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> AppResult<UploadedFile> {
        if original_name.trim().is_empty() {
            return Err(AppError::bad_request("No file uploaded"));
        }

        let size = data.len() as u64;
        if size > self.config.max_file_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "File exceeds the maximum size of {} bytes",
                self.config.max_file_size_bytes
            )));
        }

        let ext = extension_of(original_name).unwrap_or_default();
        if !self.config.is_extension_allowed(&ext) {
            return Err(AppError::validation(format!(
                "File type not allowed. Allowed: {}",
                self.config.allowed_extensions.join(", ")
            )));
        }

        let filename = stored_filename(original_name, Utc::now().timestamp_millis());
        let stored = self.storage.write(&filename, data).await?;

        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(&ext).to_string());

        info!(
            user_id = ctx.user_id,
            filename = %filename,
            size = stored.size_bytes,
            provider = self.storage.provider_type(),
            "File uploaded"
        );

        Ok(UploadedFile {
            url: public_url(&self.config.public_prefix, &filename),
            filename,
            size: stored.size_bytes,
            content_type,
        })
    }
}

fn public_url(prefix: &str, filename: &str) -> String {
    format!("{}/{filename}", prefix.trim_end_matches('/'))
}

fn guess_content_type(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use blogdesk_core::error::ErrorKind;
    use blogdesk_entity::user::UserRole;
    use blogdesk_storage::LocalStorageProvider;

    use super::*;

    async fn service(dir: &std::path::Path, max: u64) -> UploadService {
        let storage = Arc::new(LocalStorageProvider::new(dir.to_str().unwrap()).await.unwrap());
        let config = UploadConfig {
            max_file_size_bytes: max,
            ..UploadConfig::default()
        };
        UploadService::new(storage, config)
    }

    fn ctx() -> RequestContext {
        RequestContext::new(1, UserRole::Author, "a@example.com".into())
    }

    #[tokio::test]
    async fn test_store_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 1024).await;

        let file = svc
            .store(&ctx(), "Cover Image.PNG", None, Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert!(file.filename.starts_with("cover-image-"));
        assert!(file.filename.ends_with(".png"));
        assert_eq!(file.url, format!("/uploads/{}", file.filename));
        assert_eq!(file.size, 3);
        assert_eq!(file.content_type, "image/png");
        assert!(dir.path().join(&file.filename).exists());
    }

    #[tokio::test]
    async fn test_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path(), 4).await;

        let too_big = svc
            .store(&ctx(), "a.png", None, Bytes::from_static(b"12345"))
            .await
            .unwrap_err();
        assert_eq!(too_big.kind, ErrorKind::PayloadTooLarge);

        let bad_type = svc
            .store(&ctx(), "run.exe", None, Bytes::from_static(b"1"))
            .await
            .unwrap_err();
        assert_eq!(bad_type.kind, ErrorKind::Validation);

        let missing = svc
            .store(&ctx(), "", None, Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(missing.kind, ErrorKind::BadRequest);
    }
}
