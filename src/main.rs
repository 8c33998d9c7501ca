//! BlogDesk Server: REST backend for the BlogDesk blog CMS.
//!
//! Main entry point that loads configuration, prepares the database, and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("BLOGDESK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Starting BlogDesk v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Connect, migrate, and serve until shutdown.
async fn run(config: AppConfig) -> Result<(), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    blogdesk_database::migration::run_migrations(pool.pool()).await?;

    blogdesk_api::run_server(config, pool.into_pool()).await
}
