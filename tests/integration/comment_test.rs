//! Integration tests for comments on posts.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (bob_id, bob) = app.author("Bob", "bob@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Discuss", "content": "x", "status": "published" }))
        .await;
    let path = format!("/api/blogs/{}/comments", blog["id"]);

    let anonymous = app
        .request("POST", &path, Some(json!({ "content": "hi" })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let blank = app
        .request("POST", &path, Some(json!({ "content": "   " })), Some(&bob))
        .await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);

    let created = app
        .request("POST", &path, Some(json!({ "content": "  Great post!  " })), Some(&bob))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["content"], "Great post!");
    assert_eq!(created.body["data"]["user"]["id"], bob_id);
    assert_eq!(created.body["data"]["user"]["name"], "Bob");

    let listed = app.request("GET", &path, None, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["pagination"]["total"], 1);
    assert_eq!(listed.body["data"]["items"][0]["content"], "Great post!");

    let with_count = app
        .request("GET", &format!("/api/blogs/{}", blog["id"]), None, None)
        .await;
    assert_eq!(with_count.body["data"]["comments_count"], 1);
}

#[tokio::test]
async fn test_comments_disabled_or_hidden_post() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;

    let closed = app
        .create_blog(
            &ada,
            json!({ "title": "Closed", "content": "x", "status": "published", "allow_comments": false }),
        )
        .await;
    let response = app
        .request(
            "POST",
            &format!("/api/blogs/{}/comments", closed["id"]),
            Some(json!({ "content": "hello" })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let draft = app
        .create_blog(&ada, json!({ "title": "Draft", "content": "x" }))
        .await;
    let hidden = app
        .request(
            "POST",
            &format!("/api/blogs/{}/comments", draft["id"]),
            Some(json!({ "content": "hello" })),
            Some(&bob),
        )
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_delete_permissions() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;
    let (_, carol) = app.author("Carol", "carol@example.com").await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Moderated", "content": "x", "status": "published" }))
        .await;
    let other = app
        .create_blog(&ada, json!({ "title": "Elsewhere", "content": "x", "status": "published" }))
        .await;
    let path = format!("/api/blogs/{}/comments", blog["id"]);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = app
            .request("POST", &path, Some(json!({ "content": "from bob" })), Some(&bob))
            .await;
        ids.push(created.body["data"]["id"].as_i64().unwrap());
    }

    let stranger = app
        .request("DELETE", &format!("{path}/{}", ids[0]), None, Some(&carol))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let wrong_post = app
        .request(
            "DELETE",
            &format!("/api/blogs/{}/comments/{}", other["id"], ids[0]),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(wrong_post.status, StatusCode::NOT_FOUND);

    let bad_id = app
        .request("DELETE", &format!("{path}/abc"), None, Some(&bob))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    for (token, id) in [(&bob, ids[0]), (&ada, ids[1]), (&admin, ids[2])] {
        let deleted = app
            .request("DELETE", &format!("{path}/{id}"), None, Some(token))
            .await;
        assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);
        assert_eq!(deleted.body["data"]["id"], id);
    }

    let listed = app.request("GET", &path, None, None).await;
    assert_eq!(listed.body["data"]["pagination"]["total"], 0);
}
