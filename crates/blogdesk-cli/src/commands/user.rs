//! User management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use blogdesk_core::config::AppConfig;
use blogdesk_core::error::AppError;
use blogdesk_core::types::pagination::PageRequest;
use blogdesk_database::repositories::UserRepository;
use blogdesk_entity::user::{User, UserRole};
use blogdesk_service::AdminUserService;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List registered users, newest first
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Users per page
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Grant the admin role
    Promote {
        /// Account email
        email: String,
    },
    /// Revert an admin to author
    Demote {
        /// Account email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    created_at: String,
    last_login_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_login_at: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let admin = AdminUserService::new(Arc::new(UserRepository::new(pool)));

    match &args.command {
        UserCommand::List { page, per_page } => {
            let users = admin
                .list_users(&PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<UserRow> = users.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} users)",
                    users.pagination.page, users.pagination.total_pages, users.pagination.total
                );
            }
        }
        UserCommand::Promote { email } => {
            let user = admin.set_role(email, UserRole::Admin).await?;
            output::print_success(&format!("{} is now {}", user.email, user.role));
        }
        UserCommand::Demote { email } => {
            let user = admin.set_role(email, UserRole::Author).await?;
            output::print_success(&format!("{} is now {}", user.email, user.role));
        }
    }

    Ok(())
}
