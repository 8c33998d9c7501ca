//! Integration tests for health, site stats, uploads, and routing fallbacks.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_site_stats() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin("Root", "root@example.com").await;
    app.author("Ada", "ada@example.com").await;

    let live = app
        .create_blog(&admin, json!({ "title": "Live", "content": "x", "status": "published", "tags": ["a"] }))
        .await;
    app.create_blog(&admin, json!({ "title": "Draft", "content": "x" }))
        .await;
    app.request("POST", &format!("/api/blogs/{}/views", live["id"]), None, None)
        .await;

    let response = app.request("GET", "/api/stats", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["blogs"]["total"], 2);
    assert_eq!(data["blogs"]["published"], 1);
    assert_eq!(data["blogs"]["draft"], 1);
    assert_eq!(data["blogs"]["archived"], 0);
    assert_eq!(data["users"]["total"], 2);
    assert_eq!(data["tags"]["total"], 1);
    assert_eq!(data["categories"]["total"], 0);
    assert_eq!(data["comments"]["total"], 0);
    assert_eq!(data["views"]["total"], 1);
    assert_eq!(data["latest"]["blogs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_route_is_enveloped_404() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/nope", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
    assert_eq!(response.body["error"]["message"], "Route GET /api/nope not found");
}

#[tokio::test]
async fn test_upload_and_serve() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let anonymous = app.upload("/api/upload", "cat.png", b"png-bytes", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let uploaded = app
        .upload("/api/upload", "My Cat.PNG", b"png-bytes", Some(&token))
        .await;
    assert_eq!(uploaded.status, StatusCode::OK, "{:?}", uploaded.body);
    let data = &uploaded.body["data"];
    assert_eq!(data["size"], 9);
    let url = data["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let served = app.request("GET", &url, None, None).await;
    assert_eq!(served.status, StatusCode::OK);

    let alias = app
        .upload("/api/blogs/upload", "dog.jpg", b"jpg-bytes", Some(&token))
        .await;
    assert_eq!(alias.status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let wrong_type = app
        .upload("/api/upload", "script.exe", b"MZ", Some(&token))
        .await;
    assert_eq!(wrong_type.status, StatusCode::UNPROCESSABLE_ENTITY);

    let too_big = vec![0u8; 2048];
    let oversized = app
        .upload("/api/upload", "huge.png", &too_big, Some(&token))
        .await;
    assert_eq!(oversized.status, StatusCode::PAYLOAD_TOO_LARGE);
}
