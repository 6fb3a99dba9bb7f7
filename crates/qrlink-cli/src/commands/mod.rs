//! CLI command definitions and dispatch.

pub mod config;
pub mod images;
pub mod link;
pub mod migrate;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use qrlink_core::config::AppConfig;
use qrlink_core::error::AppError;
use qrlink_core::traits::SystemClock;
use qrlink_service::LinkRegistry;

use crate::output::{self, OutputFormat};

/// QrLink: short links and QR codes for private images
#[derive(Debug, Parser)]
#[command(name = "qrlink", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect and delete an owner's images
    Images(images::ImagesArgs),
    /// Print the shareable link (QR payload) for an image
    Link(link::LinkArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Images(args) => images::execute(args, &self.config, self.format).await,
            Commands::Link(args) => link::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Load configuration from the given base file plus the `QRLINK_ENV` overlay.
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("QRLINK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(config_path, &env)
}

/// Connect both stores and build a registry over them.
pub async fn connect_registry(config: &AppConfig) -> Result<LinkRegistry, AppError> {
    if config.database.provider == "memory" {
        output::print_warning("database.provider is \"memory\": the CLI sees an empty store");
    }
    let (records, _pool) = qrlink_database::build_record_store(&config.database).await?;
    let store =
        qrlink_storage::build_object_store(&config.storage, Arc::new(SystemClock)).await?;
    Ok(LinkRegistry::new(
        records,
        store.object_store,
        Duration::from_secs(config.storage.operation_timeout_seconds),
    ))
}
