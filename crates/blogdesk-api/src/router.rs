//! Route definitions for the BlogDesk HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, Uri},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::warn;

use blogdesk_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(blog_routes())
        .merge(category_routes())
        .merge(tag_routes())
        .merge(comment_routes())
        .merge(user_routes())
        .merge(upload_routes());

    let mut router = Router::new().nest("/api", api_routes);

    let prefix = state.config.upload.public_prefix.trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        router = router.nest_service(prefix, ServeDir::new(&state.config.upload.directory));
    } else {
        warn!(prefix = %state.config.upload.public_prefix, "Invalid upload prefix; uploads are not served");
    }

    router
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::logging::request_logging))
                .layer(TimeoutLayer::new(timeout))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// 404 for any unmatched route, inside the standard envelope.
async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    AppError::not_found(format!("Route {method} {} not found", uri.path())).into()
}

/// Liveness and site counters
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/stats", get(handlers::health::stats))
}

/// Auth endpoints: register, login, refresh, logout, me, change-password
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/change-password", post(handlers::auth::change_password))
}

/// Post CRUD, listing, and publishing workflow
fn blog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/blogs",
            get(handlers::blog::list_blogs).post(handlers::blog::create_blog),
        )
        .route("/blogs/search", get(handlers::blog::search_blogs))
        .route("/blogs/my-blogs", get(handlers::blog::my_blogs))
        .route(
            "/blogs/{id}",
            get(handlers::blog::get_blog)
                .put(handlers::blog::update_blog)
                .delete(handlers::blog::delete_blog),
        )
        .route("/blogs/{id}/publish", patch(handlers::blog::publish_blog))
        .route("/blogs/{id}/unpublish", patch(handlers::blog::unpublish_blog))
        .route("/blogs/{id}/archive", patch(handlers::blog::archive_blog))
        .route("/blogs/{id}/views", post(handlers::blog::record_view))
        .route("/blogs/{id}/related", get(handlers::blog::related_blogs))
}

/// Category catalogue
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/blogs/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/blogs/categories/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

/// Tag catalogue
fn tag_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/blogs/tags",
            get(handlers::tag::list_tags).post(handlers::tag::create_tag),
        )
        .route(
            "/blogs/tags/{id}",
            get(handlers::tag::get_tag)
                .put(handlers::tag::update_tag)
                .delete(handlers::tag::delete_tag),
        )
}

/// Comments nested under a post
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/blogs/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route(
            "/blogs/{id}/comments/{comment_id}",
            delete(handlers::comment::delete_comment),
        )
}

/// User self-service
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        .route("/users/stats", get(handlers::user::get_stats))
        .route("/users/comments", get(handlers::user::list_comments))
        .route("/users/account", delete(handlers::user::delete_account))
        .route("/users/export", get(handlers::user::export_data))
}

/// Media uploads
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload::upload_file))
        .route("/blogs/upload", post(handlers::upload::upload_file))
}
