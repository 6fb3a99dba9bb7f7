//! Database migration management commands.

use clap::{Args, Subcommand};

use qrlink_core::error::AppError;
use qrlink_database::connection::connect;
use qrlink_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    if config.database.provider != "postgres" {
        return Err(AppError::configuration(format!(
            "Migrations need the postgres provider, not {:?}",
            config.database.provider
        )));
    }

    match &args.command {
        MigrateCommand::Run => {
            let pool = connect(&config.database).await?;
            println!("Running database migrations...");
            run_migrations(&pool).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
