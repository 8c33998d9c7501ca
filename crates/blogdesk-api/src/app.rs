//! Application builder: wires repositories, services, router, and middleware
//! into an Axum app and serves it.

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::info;

use blogdesk_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, RbacEnforcer};
use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_core::traits::storage::StorageProvider;
use blogdesk_database::repositories::{
    BlogRepository, CategoryRepository, CommentRepository, StatsRepository, TagRepository,
    UserRepository,
};
use blogdesk_service::{
    AuthService, BlogService, CategoryService, CommentService, StatsService, TagService,
    UploadService, UserService,
};
use blogdesk_storage::LocalStorageProvider;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds every repository and service on top of `db_pool`.
pub async fn build_state(config: AppConfig, db_pool: SqlitePool) -> Result<AppState, AppError> {
    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let blog_repo = Arc::new(BlogRepository::new(db_pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let tag_repo = Arc::new(TagRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepository::new(db_pool.clone()));
    let stats_repo = Arc::new(StatsRepository::new(db_pool.clone()));

    // ── Auth primitives ──────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let rbac_enforcer = Arc::new(RbacEnforcer::new());

    // ── Upload storage ───────────────────────────────────────────
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.upload.directory).await?);
    info!(
        provider = storage.provider_type(),
        directory = %config.upload.directory,
        "Upload storage ready"
    );

    // ── Services ─────────────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&blog_repo),
        Arc::clone(&comment_repo),
        Arc::clone(&stats_repo),
        Arc::clone(&password_hasher),
    ));
    let blog_service = Arc::new(BlogService::new(
        Arc::clone(&blog_repo),
        Arc::clone(&category_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&rbac_enforcer),
    ));
    let category_service = Arc::new(CategoryService::new(
        Arc::clone(&category_repo),
        Arc::clone(&rbac_enforcer),
    ));
    let tag_service = Arc::new(TagService::new(
        Arc::clone(&tag_repo),
        Arc::clone(&rbac_enforcer),
    ));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&comment_repo),
        Arc::clone(&blog_repo),
        Arc::clone(&rbac_enforcer),
    ));
    let stats_service = Arc::new(StatsService::new(
        Arc::clone(&stats_repo),
        Arc::clone(&blog_repo),
        Arc::clone(&user_repo),
        Arc::clone(&category_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&comment_repo),
    ));
    let upload_service = Arc::new(UploadService::new(storage, config.upload.clone()));

    Ok(AppState {
        config: Arc::new(config),
        started_at: Utc::now(),
        db_pool,
        auth_service,
        user_service,
        blog_service,
        category_service,
        tag_service,
        comment_service,
        stats_service,
        upload_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the BlogDesk server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig, db_pool: SqlitePool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config, db_pool).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("BlogDesk server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("BlogDesk server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, starting graceful shutdown...");
}
