//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use blogdesk_core::config::AppConfig;
use blogdesk_database::DatabasePool;
use blogdesk_database::repositories::UserRepository;
use blogdesk_entity::user::UserRole;

pub const PASSWORD: &str = "password123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: sqlx::SqlitePool,
    /// Application config
    pub config: AppConfig,
    /// Keeps the upload directory alive for the test's duration
    _upload_dir: TempDir,
}

impl TestApp {
    /// Create a new test application backed by an in-memory database
    pub async fn new() -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.auth.jwt_secret = "integration-access-secret".to_string();
        config.auth.refresh_secret = "integration-refresh-secret".to_string();
        config.upload.directory = upload_dir.path().to_string_lossy().to_string();
        config.upload.max_file_size_bytes = 1024;

        let db_pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();

        blogdesk_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let state = blogdesk_api::build_state(config.clone(), db_pool.clone())
            .await
            .expect("Failed to build state");
        let router = blogdesk_api::build_app(state);

        Self {
            router,
            db_pool,
            config,
            _upload_dir: upload_dir,
        }
    }

    /// Register an author and return the `user` object
    pub async fn register(&self, name: &str, email: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        response.body["data"]["user"].clone()
    }

    /// Login and return JWT access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Register an author, log in, and return `(user_id, token)`
    pub async fn author(&self, name: &str, email: &str) -> (i64, String) {
        let user = self.register(name, email).await;
        let token = self.login(email, PASSWORD).await;
        (user["id"].as_i64().expect("user id"), token)
    }

    /// Register an account, promote it to admin, and return `(user_id, token)`
    pub async fn admin(&self, name: &str, email: &str) -> (i64, String) {
        let (id, token) = self.author(name, email).await;
        UserRepository::new(self.db_pool.clone())
            .update_role(id, UserRole::Admin)
            .await
            .expect("Failed to promote admin");
        (id, token)
    }

    /// Create a post and return its `data` object
    pub async fn create_blog(&self, token: &str, body: Value) -> Value {
        let response = self
            .request("POST", "/api/blogs", Some(body), Some(token))
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create blog failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as the multipart `file` field
    pub async fn upload(&self, path: &str, filename: &str, data: &[u8], token: Option<&str>) -> TestResponse {
        let boundary = "blogdesk-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            );
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The envelope's `error.code`
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}
