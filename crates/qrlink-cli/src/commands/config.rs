//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use qrlink_core::config::AppConfig;
use qrlink_core::error::AppError;
use qrlink_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate the configuration and print a summary
    Validate,
}

const MASK: &str = "****";

fn redact(mut config: AppConfig) -> AppConfig {
    config.database.url = mask_password(&config.database.url);
    config.storage.local.signing_secret = MASK.to_string();
    if !config.storage.s3.secret_key.is_empty() {
        config.storage.s3.secret_key = MASK.to_string();
    }
    config
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&redact(config), format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Server", &format!("{}:{}", config.server.host, config.server.port));
                output::print_kv("Database", &config.database.provider);
                output::print_kv("Storage", &config.storage.provider);
                output::print_kv("Base address", &config.links.base_address);
                output::print_kv(
                    "URL lifetime",
                    &format!("{}s", config.links.signed_url_ttl_seconds),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
