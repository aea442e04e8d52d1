//! Verity CLI: command-line client for the Verity API.
//!
//! Set VERITY_API_URL (or API_URL); defaults to http://localhost:4000.

use anyhow::Context;
use clap::Parser;
use verity_api_client::ApiClient;
use verity_cli::{init_tracing, print_json, Cli, Commands};
use verity_core::models::Modality;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::from_env().context("Failed to create API client")?;
    tracing::debug!(base_url = client.base_url(), "Using API");

    match cli.command {
        Commands::Text { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Provide text or --file"),
            };
            print_json(&client.analyze_text(&text).await?)?;
        }
        Commands::Image { path } => {
            print_json(&client.analyze_file(Modality::Image, &path).await?)?;
        }
        Commands::Video { path } => {
            print_json(&client.analyze_file(Modality::Video, &path).await?)?;
        }
        Commands::Audio { path } => {
            print_json(&client.analyze_file(Modality::Audio, &path).await?)?;
        }
        Commands::History { limit } => {
            print_json(&client.list_recent(Some(limit)).await?)?;
        }
    }

    Ok(())
}
