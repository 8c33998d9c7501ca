//! Integration tests for posts: CRUD, visibility, workflow, views, related.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_blog_defaults() {
    let app = TestApp::new().await;
    let (author_id, token) = app.author("Ada", "ada@example.com").await;

    let blog = app
        .create_blog(
            &token,
            json!({ "title": "Hello World", "content": "First   post\n body", "tags": "Rust, rust ,Axum" }),
        )
        .await;

    assert_eq!(blog["slug"], "hello-world");
    assert_eq!(blog["status"], "draft");
    assert!(blog["published_at"].is_null());
    assert_eq!(blog["excerpt"], "First post body");
    assert_eq!(blog["allow_comments"], true);
    assert_eq!(blog["views"], 0);
    assert_eq!(blog["author"]["id"], author_id);
    assert_eq!(blog["author"]["name"], "Ada");
    assert_eq!(blog["comments_count"], 0);

    let tags = blog["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().any(|t| t["slug"] == "rust"));
    assert!(tags.iter().any(|t| t["slug"] == "axum"));
}

#[tokio::test]
async fn test_duplicate_titles_get_suffixed_slugs() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let first = app
        .create_blog(&token, json!({ "title": "Same Title", "content": "a" }))
        .await;
    let second = app
        .create_blog(&token, json!({ "title": "Same Title", "content": "b" }))
        .await;

    assert_eq!(first["slug"], "same-title");
    assert_eq!(second["slug"], "same-title-1");

    let explicit = app
        .request(
            "POST",
            "/api/blogs",
            Some(json!({ "title": "Other", "content": "c", "slug": "same-title" })),
            Some(&token),
        )
        .await;
    assert_eq!(explicit.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_requires_auth_and_valid_body() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let anonymous = app
        .request("POST", "/api/blogs", Some(json!({ "title": "T", "content": "c" })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let no_title = app
        .request("POST", "/api/blogs", Some(json!({ "title": "", "content": "c" })), Some(&token))
        .await;
    assert_eq!(no_title.status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_status = app
        .request(
            "POST",
            "/api/blogs",
            Some(json!({ "title": "T", "content": "c", "status": "scheduled" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_status.status, StatusCode::UNPROCESSABLE_ENTITY);

    let bad_category = app
        .request(
            "POST",
            "/api/blogs",
            Some(json!({ "title": "T", "content": "c", "category_id": 999 })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_category.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_drafts_are_hidden_from_others() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let draft = app
        .create_blog(&ada, json!({ "title": "Secret", "content": "wip" }))
        .await;
    let path = format!("/api/blogs/{}", draft["id"]);

    assert_eq!(app.request("GET", &path, None, None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.request("GET", &path, None, Some(&bob)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.request("GET", &path, None, Some(&ada)).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, Some(&admin)).await.status, StatusCode::OK);

    let by_slug = app.request("GET", "/api/blogs/secret", None, Some(&ada)).await;
    assert_eq!(by_slug.status, StatusCode::OK);
    assert_eq!(by_slug.body["data"]["id"], draft["id"]);
}

#[tokio::test]
async fn test_list_defaults_to_published() {
    let app = TestApp::new().await;
    let (ada_id, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;

    app.create_blog(&ada, json!({ "title": "Live", "content": "x", "status": "published" }))
        .await;
    app.create_blog(&ada, json!({ "title": "Draft", "content": "x" }))
        .await;
    app.create_blog(&bob, json!({ "title": "Bob Draft", "content": "x" }))
        .await;

    let public = app.request("GET", "/api/blogs", None, None).await;
    assert_eq!(public.status, StatusCode::OK);
    let items = public.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Live");
    assert_eq!(public.body["data"]["pagination"]["total"], 1);
    assert_eq!(public.body["meta"]["sort"], "created_at:DESC");

    let unpublished_anon = app.request("GET", "/api/blogs?status=draft", None, None).await;
    assert_eq!(unpublished_anon.status, StatusCode::UNAUTHORIZED);

    // Non-admins only ever see their own unpublished posts.
    let ada_all = app.request("GET", "/api/blogs?status=all", None, Some(&ada)).await;
    assert_eq!(ada_all.body["data"]["pagination"]["total"], 2);
    let ada_peek = app
        .request("GET", &format!("/api/blogs?status=draft&author={}", ada_id), None, Some(&bob))
        .await;
    assert_eq!(ada_peek.body["data"]["pagination"]["total"], 0);

    let invalid = app.request("GET", "/api/blogs?author=abc", None, None).await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let category = app
        .request("POST", "/api/blogs/categories", Some(json!({ "name": "Tech News" })), Some(&admin))
        .await;
    let category_id = category.body["data"]["id"].as_i64().unwrap();

    for i in 0..3 {
        app.create_blog(
            &admin,
            json!({
                "title": format!("Tech {i}"),
                "content": "gadgets",
                "status": "published",
                "category_id": category_id,
                "tags": ["hardware"],
                "is_featured": i == 0,
            }),
        )
        .await;
    }
    app.create_blog(&admin, json!({ "title": "Cooking", "content": "pasta recipes", "status": "published" }))
        .await;

    let by_category = app.request("GET", "/api/blogs?category=tech-news", None, None).await;
    assert_eq!(by_category.body["data"]["pagination"]["total"], 3);

    let by_tag = app.request("GET", "/api/blogs?tag=hardware", None, None).await;
    assert_eq!(by_tag.body["data"]["pagination"]["total"], 3);

    let featured = app.request("GET", "/api/blogs?featured=true", None, None).await;
    assert_eq!(featured.body["data"]["pagination"]["total"], 1);

    let search = app.request("GET", "/api/blogs?search=PASTA", None, None).await;
    assert_eq!(search.body["data"]["items"][0]["title"], "Cooking");

    let page = app.request("GET", "/api/blogs?page=2&limit=3", None, None).await;
    let pagination = &page.body["data"]["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["per_page"], 3);
    assert_eq!(pagination["total"], 4);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(pagination["has_next"], false);
    assert_eq!(pagination["has_previous"], true);
    assert_eq!(page.body["data"]["items"].as_array().unwrap().len(), 1);

    let sorted = app
        .request("GET", "/api/blogs?sort_by=title&sort_order=asc", None, None)
        .await;
    assert_eq!(sorted.body["data"]["items"][0]["title"], "Cooking");
    assert_eq!(sorted.body["meta"]["sort"], "title:ASC");
}

#[tokio::test]
async fn test_search_and_my_blogs() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;

    app.create_blog(&ada, json!({ "title": "Rust ownership", "content": "borrowck", "status": "published" }))
        .await;
    app.create_blog(&ada, json!({ "title": "Rust drafts", "content": "wip" }))
        .await;
    app.create_blog(&bob, json!({ "title": "Go channels", "content": "csp", "status": "published" }))
        .await;

    let search = app.request("GET", "/api/blogs/search?q=rust", None, None).await;
    assert_eq!(search.status, StatusCode::OK);
    assert_eq!(search.body["data"]["pagination"]["total"], 1);

    let mine = app.request("GET", "/api/blogs/my-blogs", None, Some(&ada)).await;
    assert_eq!(mine.body["data"]["pagination"]["total"], 2);

    let mine_drafts = app
        .request("GET", "/api/blogs/my-blogs?status=draft", None, Some(&ada))
        .await;
    assert_eq!(mine_drafts.body["data"]["pagination"]["total"], 1);

    let anonymous = app.request("GET", "/api/blogs/my-blogs", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_and_delete_ownership() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;
    let (_, bob) = app.author("Bob", "bob@example.com").await;
    let (_, admin) = app.admin("Root", "root@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Original", "content": "body", "tags": ["one"] }))
        .await;
    let path = format!("/api/blogs/{}", blog["id"]);

    let forbidden = app
        .request("PUT", &path, Some(json!({ "title": "Hijacked" })), Some(&bob))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "title": "Renamed", "tags": ["two", "three"] })),
            Some(&ada),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["title"], "Renamed");
    assert_eq!(updated.body["data"]["slug"], "renamed");
    assert_eq!(updated.body["data"]["content"], "body");
    assert_eq!(updated.body["data"]["tags"].as_array().unwrap().len(), 2);

    let by_admin = app
        .request("PUT", &path, Some(json!({ "is_featured": true })), Some(&admin))
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["data"]["is_featured"], true);
    assert_eq!(by_admin.body["data"]["slug"], "renamed");

    let delete_other = app.request("DELETE", &path, None, Some(&bob)).await;
    assert_eq!(delete_other.status, StatusCode::FORBIDDEN);

    let deleted = app.request("DELETE", &path, None, Some(&ada)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"]["id"], blog["id"]);

    let gone = app.request("GET", &path, None, Some(&ada)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_workflow() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Workflow", "content": "body" }))
        .await;
    let id = blog["id"].clone();

    let published = app
        .request("PATCH", &format!("/api/blogs/{id}/publish"), None, Some(&ada))
        .await;
    assert_eq!(published.status, StatusCode::OK);
    assert_eq!(published.body["data"]["status"], "published");
    let published_at = published.body["data"]["published_at"].clone();
    assert!(published_at.is_string());

    let visible = app.request("GET", &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(visible.status, StatusCode::OK);

    let unpublished = app
        .request("PATCH", &format!("/api/blogs/{id}/unpublish"), None, Some(&ada))
        .await;
    assert_eq!(unpublished.body["data"]["status"], "draft");

    let archived = app
        .request("PATCH", &format!("/api/blogs/{id}/archive"), None, Some(&ada))
        .await;
    assert_eq!(archived.body["data"]["status"], "archived");

    let hidden = app.request("GET", &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    let again = app
        .request("PATCH", &format!("/api/blogs/{id}/archive"), None, Some(&ada))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["status"], "archived");
}

#[tokio::test]
async fn test_views_are_counted() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;

    let blog = app
        .create_blog(&ada, json!({ "title": "Counted", "content": "body", "status": "published" }))
        .await;
    let path = format!("/api/blogs/{}/views", blog["id"]);

    let first = app.request("POST", &path, None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["views"], 1);

    let second = app.request("POST", &path, None, None).await;
    assert_eq!(second.body["data"]["views"], 2);

    let missing = app.request("POST", "/api/blogs/9999/views", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_related_by_tags_and_category() {
    let app = TestApp::new().await;
    let (_, ada) = app.author("Ada", "ada@example.com").await;

    let source = app
        .create_blog(
            &ada,
            json!({ "title": "Source", "content": "x", "status": "published", "tags": ["rust", "web"] }),
        )
        .await;
    app.create_blog(
        &ada,
        json!({ "title": "Two Shared", "content": "x", "status": "published", "tags": ["rust", "web"] }),
    )
    .await;
    app.create_blog(
        &ada,
        json!({ "title": "One Shared", "content": "x", "status": "published", "tags": ["rust"] }),
    )
    .await;
    app.create_blog(
        &ada,
        json!({ "title": "Draft Shared", "content": "x", "tags": ["rust"] }),
    )
    .await;
    app.create_blog(
        &ada,
        json!({ "title": "Unrelated", "content": "x", "status": "published", "tags": ["cooking"] }),
    )
    .await;

    let response = app
        .request("GET", &format!("/api/blogs/{}/related", source["id"]), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let items = response.body["data"]["items"].as_array().unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Two Shared", "One Shared"]);
    assert_eq!(response.body["meta"]["total"], 2);
    assert_eq!(response.body["meta"]["limit"], 6);

    let limited = app
        .request("GET", &format!("/api/blogs/{}/related?limit=1", source["id"]), None, None)
        .await;
    assert_eq!(limited.body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(limited.body["meta"]["limit"], 1);
}

#[tokio::test]
async fn test_out_of_range_page_falls_back_to_first() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;
    app.create_blog(&token, json!({ "title": "Only", "content": "body", "status": "published" }))
        .await;

    let response = app
        .request("GET", "/api/blogs?page=9223372036854775807&per_page=100", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["pagination"]["page"], 1);
    assert_eq!(response.body["data"]["items"].as_array().unwrap().len(), 1);

    let comments = app
        .request("GET", "/api/users/comments?page=9223372036854775807", None, Some(&token))
        .await;
    assert_eq!(comments.status, StatusCode::OK);
    assert_eq!(comments.body["data"]["pagination"]["page"], 1);
}

#[tokio::test]
async fn test_route_names_are_not_used_as_slugs() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let search = app
        .create_blog(&token, json!({ "title": "Search", "content": "body", "status": "published" }))
        .await;
    assert_eq!(search["slug"], "search-1");

    let mine = app
        .create_blog(&token, json!({ "title": "My Blogs", "content": "body", "status": "published" }))
        .await;
    assert_eq!(mine["slug"], "my-blogs-1");

    let fetched = app.request("GET", "/api/blogs/search-1", None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["id"], search["id"]);

    let explicit = app
        .request(
            "POST",
            "/api/blogs",
            Some(json!({ "title": "Listing", "content": "c", "slug": "categories" })),
            Some(&token),
        )
        .await;
    assert_eq!(explicit.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(explicit.error_code(), "VALIDATION_ERROR");

    let renamed = app
        .request(
            "PUT",
            &format!("/api/blogs/{}", mine["id"]),
            Some(json!({ "slug": "tags" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_slug_conflict_suggests_free_slug() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;
    app.create_blog(&token, json!({ "title": "Release", "content": "a" })).await;
    app.create_blog(&token, json!({ "title": "Release", "content": "b" })).await;

    let conflict = app
        .request(
            "POST",
            "/api/blogs",
            Some(json!({ "title": "Other", "content": "c", "slug": "release-1" })),
            Some(&token),
        )
        .await;
    assert_eq!(conflict.status, StatusCode::CONFLICT);
    assert_eq!(conflict.body["error"]["details"]["suggestion"], "release-2");

    let malformed = app.request("GET", "/api/blogs/not%20a%20slug", None, None).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_derived_excerpt_follows_content() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let derived = app
        .create_blog(&token, json!({ "title": "Derived", "content": "old body" }))
        .await;
    let updated = app
        .request(
            "PUT",
            &format!("/api/blogs/{}", derived["id"]),
            Some(json!({ "content": "new body" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["excerpt"], "new body");

    let custom = app
        .create_blog(&token, json!({ "title": "Custom", "content": "old body", "excerpt": "Hand written" }))
        .await;
    let updated = app
        .request(
            "PUT",
            &format!("/api/blogs/{}", custom["id"]),
            Some(json!({ "content": "new body" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.body["data"]["excerpt"], "Hand written");
}
