//! Integration tests for the category and tag catalogue.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_only_admins_manage_categories() {
    let app = TestApp::new().await;
    let (_, author) = app.author("Ada", "ada@example.com").await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let forbidden = app
        .request("POST", "/api/blogs/categories", Some(json!({ "name": "News" })), Some(&author))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.error_code(), "FORBIDDEN");

    let created = app
        .request(
            "POST",
            "/api/blogs/categories",
            Some(json!({ "name": "Tech News", "description": "  Gadgets  " })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["slug"], "tech-news");
    assert_eq!(created.body["data"]["description"], "Gadgets");
    assert_eq!(created.body["data"]["posts_count"], 0);

    let duplicate = app
        .request("POST", "/api/blogs/categories", Some(json!({ "name": "Tech News" })), Some(&admin))
        .await;
    assert_eq!(duplicate.body["data"]["slug"], "tech-news-1");

    let listed = app.request("GET", "/api/blogs/categories", None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_category_get_update_by_id_or_slug() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let created = app
        .request("POST", "/api/blogs/categories", Some(json!({ "name": "Travel" })), Some(&admin))
        .await;
    let id = created.body["data"]["id"].as_i64().unwrap();

    let by_slug = app.request("GET", "/api/blogs/categories/travel", None, None).await;
    assert_eq!(by_slug.status, StatusCode::OK);
    assert_eq!(by_slug.body["data"]["id"], id);

    let renamed = app
        .request(
            "PUT",
            &format!("/api/blogs/categories/{id}"),
            Some(json!({ "name": "World Travel" })),
            Some(&admin),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["slug"], "world-travel");

    let cleared = app
        .request(
            "PUT",
            &format!("/api/blogs/categories/{id}"),
            Some(json!({ "description": null })),
            Some(&admin),
        )
        .await;
    assert!(cleared.body["data"]["description"].is_null());

    let missing = app.request("GET", "/api/blogs/categories/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let created = app
        .request("POST", "/api/blogs/categories", Some(json!({ "name": "Busy" })), Some(&admin))
        .await;
    let id = created.body["data"]["id"].as_i64().unwrap();
    let blog = app
        .create_blog(&admin, json!({ "title": "In Busy", "content": "x", "category_id": id }))
        .await;
    assert_eq!(blog["category"]["slug"], "busy");

    let blocked = app
        .request("DELETE", &format!("/api/blogs/categories/{id}"), None, Some(&admin))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.body["error"]["details"]["posts_count"], 1);

    app.request("DELETE", &format!("/api/blogs/{}", blog["id"]), None, Some(&admin))
        .await;
    let deleted = app
        .request("DELETE", &format!("/api/blogs/categories/{id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["id"], id);
}

#[tokio::test]
async fn test_tag_delete_unlinks_posts() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let blog = app
        .create_blog(
            &admin,
            json!({ "title": "Tagged", "content": "x", "status": "published", "tags": ["keep", "drop"] }),
        )
        .await;

    let tags = app.request("GET", "/api/blogs/tags", None, None).await;
    let drop = tags.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["slug"] == "drop")
        .cloned()
        .unwrap();
    assert_eq!(drop["posts_count"], 1);

    let deleted = app
        .request("DELETE", "/api/blogs/tags/drop", None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["id"], drop["id"]);

    let after = app
        .request("GET", &format!("/api/blogs/{}", blog["id"]), None, None)
        .await;
    let remaining = after.body["data"]["tags"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["slug"], "keep");
}

#[tokio::test]
async fn test_tag_create_requires_admin() {
    let app = TestApp::new().await;
    let (_, author) = app.author("Ada", "ada@example.com").await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let forbidden = app
        .request("POST", "/api/blogs/tags", Some(json!({ "name": "Rust" })), Some(&author))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let created = app
        .request(
            "POST",
            "/api/blogs/tags",
            Some(json!({ "name": "Rust Lang", "slug": "rust" })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["slug"], "rust");

    let taken = app
        .request(
            "POST",
            "/api/blogs/tags",
            Some(json!({ "name": "Other", "slug": "rust" })),
            Some(&admin),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
}
