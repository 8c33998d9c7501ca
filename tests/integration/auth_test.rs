//! Integration tests for the authentication flow.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_returns_author_without_hash() {
    let app = TestApp::new().await;
    let user = app.register("Ada Lovelace", "Ada@Example.com").await;

    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["role"], "author");
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Other", "email": "ADA@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_register_short_password_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_invalid_email_lists_field() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "name": "Ada", "email": "not-an-email", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["error"]["details"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrongpassword" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_me_authenticated() {
    let app = TestApp::new().await;
    let (id, token) = app.author("Ada", "ada@example.com").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["id"], id);
    assert!(response.body["data"]["user"]["last_login_at"].is_string());
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "UNAUTHORIZED");

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    app.register("Ada", "ada@example.com").await;
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ada@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["refresh_token"].as_str().unwrap().to_string();
    let access_token = login.body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_access = response.body["data"]["access_token"].as_str().unwrap();
    let me = app.request("GET", "/api/auth/me", None, Some(new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    // An access token is not accepted as a refresh token.
    let wrong_kind = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": access_token })),
            None,
        )
        .await;
    assert_eq!(wrong_kind.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_is_stateless() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["message"], "Logged out");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let (_, token) = app.author("Ada", "ada@example.com").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "current_password": "nope-nope", "new_password": "newpass456" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let same = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "current_password": PASSWORD, "new_password": PASSWORD })),
            Some(&token),
        )
        .await;
    assert_eq!(same.status, StatusCode::UNPROCESSABLE_ENTITY);

    let ok = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "current_password": PASSWORD, "new_password": "newpass456" })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    app.login("ada@example.com", "newpass456").await;
}
