//! Marketplace CLI commands

use anyhow::Result;
use clap::Subcommand;
use stratum_core::marketplace::{known_marketplaces, resolve_marketplace};
use stratum_scanner::ClaudeLayout;

/// Marketplace commands
#[derive(Subcommand)]
pub enum MarketplaceCommands {
    /// List known marketplaces
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a template link against installed marketplaces
    Resolve {
        /// Template source URL or owner/repo slug
        link: String,
    },
}

/// Execute a marketplace command
pub fn run(layout: &ClaudeLayout, action: MarketplaceCommands) -> Result<()> {
    let marketplaces = known_marketplaces(layout)?;

    match action {
        MarketplaceCommands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&marketplaces)?);
                return Ok(());
            }
            if marketplaces.is_empty() {
                println!("No known marketplaces");
                return Ok(());
            }
            for marketplace in &marketplaces {
                println!("{:20} {}", marketplace.name, marketplace.location);
            }
        }
        MarketplaceCommands::Resolve { link } => match resolve_marketplace(&link, &marketplaces) {
            Some(name) => println!("installed via '{name}'"),
            None => println!("not installed"),
        },
    }
    Ok(())
}
