//! Start the BlogDesk server.

use clap::Args;

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip running database migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting BlogDesk server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    let pool = super::create_db_pool(&config).await?;

    if !args.skip_migrations {
        println!("Running database migrations...");
        blogdesk_database::migration::run_migrations(&pool).await?;
        println!("  Migrations applied successfully.");
    }

    blogdesk_api::run_server(config, pool).await
}
