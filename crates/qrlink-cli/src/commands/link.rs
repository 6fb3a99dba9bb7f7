//! Print the QR payload for an image.

use clap::Args;
use serde::Serialize;

use qrlink_core::error::AppError;
use qrlink_service::LinkBuilder;
use qrlink_service::retry::with_backoff;
use qrlink_service::RetryPolicy;

use crate::output::{self, OutputFormat};

/// Arguments for the link command
#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Image id
    pub id: String,
    /// Print the link without checking that the image exists
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    id: String,
    link: String,
}

/// Execute the link command
pub async fn execute(args: &LinkArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let id = super::images::parse_id(&args.id)?;
    let links = LinkBuilder::new(config.links.base_address.clone());

    if !args.offline {
        let registry = super::connect_registry(&config).await?;
        let retry = RetryPolicy::from_config(&config.links);
        with_backoff(retry, "resolve", || registry.resolve(&id)).await?;
    }

    let link = links.link_for(&id);
    match format {
        OutputFormat::Table => println!("{link}"),
        OutputFormat::Json => output::print_item(
            &LinkOutput {
                id: id.to_string(),
                link,
            },
            format,
        ),
    }
    Ok(())
}
