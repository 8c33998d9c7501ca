//! Health check and site statistics handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use blogdesk_service::stats::SiteStats;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "unavailable"
        }
    };
    let now = Utc::now();

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        time: now,
        database: database.to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
    }))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<SiteStats>>> {
    let stats = state.stats_service.summary().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
