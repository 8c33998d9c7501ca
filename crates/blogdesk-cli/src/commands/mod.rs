//! CLI command definitions and dispatch.

pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_database::DatabasePool;

use crate::output::OutputFormat;

/// BlogDesk blog CMS backend
#[derive(Debug, Parser)]
#[command(name = "blogdesk", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to apply (`config/<env>.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the BlogDesk server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<SqlitePool, AppError> {
    tracing::debug!(url = %config.database.url, "Opening database");
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
