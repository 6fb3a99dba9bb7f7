//! Owner image listing and deletion.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use qrlink_core::error::AppError;
use qrlink_core::types::{ImageId, OwnerId};
use qrlink_entity::image::ImageRecord;
use qrlink_service::retry::with_backoff;
use qrlink_service::{LinkBuilder, RequestContext, RetryPolicy};

use crate::output::{self, OutputFormat};

/// Arguments for image commands
#[derive(Debug, Args)]
pub struct ImagesArgs {
    /// Image subcommand
    #[command(subcommand)]
    pub command: ImagesCommand,
}

/// Image subcommands
#[derive(Debug, Subcommand)]
pub enum ImagesCommand {
    /// List an owner's images, newest first
    List {
        /// Owner id
        #[arg(long)]
        owner: String,
    },
    /// Delete an image and its blob
    Delete {
        /// Image id
        id: String,
        /// Owner id (must own the image)
        #[arg(long)]
        owner: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// One row of `images list`.
#[derive(Debug, Serialize, Tabled)]
pub struct ImageRow {
    /// Image id
    #[tabled(rename = "ID")]
    pub id: String,
    /// Creation time
    #[tabled(rename = "Created")]
    pub created_at: String,
    /// Object store key
    #[tabled(rename = "Storage Path")]
    pub storage_path: String,
    /// Shareable link
    #[tabled(rename = "Link")]
    pub link: String,
}

impl ImageRow {
    fn new(record: &ImageRecord, links: &LinkBuilder) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            storage_path: record.storage_path.clone(),
            link: links.link_for(&record.id),
        }
    }
}

fn parse_owner(raw: &str) -> Result<OwnerId, AppError> {
    OwnerId::parse(raw).map_err(|e| AppError::invalid_input(format!("Invalid owner id: {e}")))
}

/// Parse an image id argument.
pub fn parse_id(raw: &str) -> Result<ImageId, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid image id: {raw}")))
}

/// Execute image commands
pub async fn execute(
    args: &ImagesArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let registry = super::connect_registry(&config).await?;
    let retry = RetryPolicy::from_config(&config.links);
    let links = LinkBuilder::new(config.links.base_address.clone());

    match &args.command {
        ImagesCommand::List { owner } => {
            let ctx = RequestContext::new(parse_owner(owner)?);
            let records = with_backoff(retry, "list", || registry.list(&ctx)).await?;
            let rows: Vec<ImageRow> = records.iter().map(|r| ImageRow::new(r, &links)).collect();
            output::print_list(&rows, format);
        }
        ImagesCommand::Delete { id, owner, force } => {
            let ctx = RequestContext::new(parse_owner(owner)?);
            let id = parse_id(id)?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete image {id} and its stored file?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            with_backoff(retry, "delete", || registry.delete(&ctx, &id)).await?;
            output::print_success(&format!("Image {id} deleted."));
        }
    }

    Ok(())
}
