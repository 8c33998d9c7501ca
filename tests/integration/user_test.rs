//! Integration tests for user self-service endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_profile_update_keeps_omitted_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let first = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(json!({ "bio": "Mathematician", "location": "London" })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["bio"], "Mathematician");

    let second = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(json!({ "name": "Ada L." })),
            Some(&token),
        )
        .await;
    assert_eq!(second.body["data"]["name"], "Ada L.");
    assert_eq!(second.body["data"]["location"], "London");

    let profile = app.request("GET", "/api/users/profile", None, Some(&token)).await;
    assert_eq!(profile.body["data"]["bio"], "Mathematician");
    assert!(profile.body["data"].get("password_hash").is_none());

    let blank = app
        .request("PUT", "/api/users/profile", Some(json!({ "name": "  " })), Some(&token))
        .await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_user_stats() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;

    let popular = app
        .create_blog(&ada, json!({ "title": "Popular", "content": "x", "status": "published" }))
        .await;
    app.create_blog(&ada, json!({ "title": "Pending", "content": "x" }))
        .await;
    for _ in 0..3 {
        app.request("POST", &format!("/api/blogs/{}/views", popular["id"]), None, None)
            .await;
    }
    app.request(
        "POST",
        &format!("/api/blogs/{}/comments", popular["id"]),
        Some(json!({ "content": "nice" })),
        Some(&bob),
    )
    .await;

    let stats = app.request("GET", "/api/users/stats", None, Some(&ada)).await;
    assert_eq!(stats.status, StatusCode::OK);
    let data = &stats.body["data"];
    assert_eq!(data["total_posts"], 2);
    assert_eq!(data["published_posts"], 1);
    assert_eq!(data["draft_posts"], 1);
    assert_eq!(data["total_views"], 3);
    assert_eq!(data["total_comments_received"], 1);
    assert_eq!(data["total_comments_written"], 0);
    assert_eq!(data["top_post"]["slug"], "popular");

    let bob_stats = app.request("GET", "/api/users/stats", None, Some(&bob)).await;
    assert_eq!(bob_stats.body["data"]["total_comments_written"], 1);
    assert!(bob_stats.body["data"]["top_post"].is_null());
}

#[tokio::test]
async fn test_user_comments_list_blog_reference() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Mine", "content": "x", "status": "published" }))
        .await;
    app.request(
        "POST",
        &format!("/api/blogs/{}/comments", blog["id"]),
        Some(json!({ "content": "self reply" })),
        Some(&ada),
    )
    .await;

    let comments = app.request("GET", "/api/users/comments", None, Some(&ada)).await;
    assert_eq!(comments.status, StatusCode::OK);
    let item = &comments.body["data"]["items"][0];
    assert_eq!(item["content"], "self reply");
    assert_eq!(item["blog"]["slug"], "mine");
}

#[tokio::test]
async fn test_export_is_a_download() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    app.create_blog(&ada, json!({ "title": "Exported", "content": "x" }))
        .await;

    let response = app.request("GET", "/api/users/export", None, Some(&ada)).await;
    assert_eq!(response.status, StatusCode::OK);

    let disposition = response
        .headers
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(disposition.contains("user-data.json"));

    assert_eq!(response.body["profile"]["email"], "ada@example.com");
    assert!(response.body["profile"].get("password_hash").is_none());
    assert_eq!(response.body["posts"].as_array().unwrap().len(), 1);
    assert!(response.body["exported_at"].is_string());
}

#[tokio::test]
async fn test_delete_account_requires_password() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    app.create_blog(&ada, json!({ "title": "Orphan", "content": "x", "status": "published" }))
        .await;

    let wrong = app
        .request("DELETE", "/api/users/account", Some(json!({ "password": "nope-nope" })), Some(&ada))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let deleted = app
        .request("DELETE", "/api/users/account", Some(json!({ "password": PASSWORD })), Some(&ada))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&ada)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let posts = app.request("GET", "/api/blogs", None, None).await;
    assert_eq!(posts.body["data"]["pagination"]["total"], 0);
}
