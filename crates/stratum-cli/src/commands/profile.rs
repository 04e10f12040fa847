//! Profile CLI commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use stratum_core::profile::ProfileStore;
use stratum_core::switch::SwitchEngine;
use stratum_scanner::ClaudeLayout;
use uuid::Uuid;

/// Profile commands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List all profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one profile
    Show {
        /// Profile id
        id: String,
    },
    /// Create a new profile
    Create {
        /// Profile title
        title: String,
        /// Settings JSON file
        #[arg(short, long, conflicts_with = "settings")]
        file: Option<PathBuf>,
        /// Inline settings JSON
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Duplicate an existing profile
    Duplicate {
        /// Profile id
        id: String,
    },
    /// Update a profile's title and settings
    Update {
        /// Profile id
        id: String,
        /// New title
        #[arg(short, long)]
        title: String,
        /// Settings JSON file
        #[arg(short, long, conflicts_with = "settings")]
        file: Option<PathBuf>,
        /// Inline settings JSON
        #[arg(short, long)]
        settings: Option<String>,
    },
    /// Delete a profile (restores the original config if it is active)
    Delete {
        /// Profile id
        id: String,
    },
    /// Activate a profile over the live configuration
    Use {
        /// Profile id
        id: String,
    },
    /// Restore the original live configuration
    Restore,
}

fn parse_id(id: &str) -> Result<Uuid> {
    id.parse().with_context(|| format!("Invalid profile id: {id}"))
}

fn parse_settings(file: Option<&Path>, inline: Option<&str>) -> Result<serde_json::Value> {
    let raw = match (file, inline) {
        (Some(path), None) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, Some(inline)) => inline.to_string(),
        _ => bail!("Provide settings with either --file or --settings"),
    };
    serde_json::from_str(&raw).context("Settings are not valid JSON")
}

fn engine(layout: &ClaudeLayout, config_dir: &Path) -> SwitchEngine {
    let store = ProfileStore::new(config_dir.join("profiles.json"));
    SwitchEngine::new(
        store,
        layout.user_settings(),
        config_dir.join("settings.backup.json"),
    )
}

/// Execute a profile command
pub fn run(layout: &ClaudeLayout, config_dir: &Path, action: ProfileCommands) -> Result<()> {
    let engine = engine(layout, config_dir);
    let store = engine.store();

    match action {
        ProfileCommands::List { json } => {
            let profiles = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
                return Ok(());
            }
            if profiles.is_empty() {
                println!("No profiles");
                return Ok(());
            }
            for profile in profiles {
                let marker = if profile.using { " (active)" } else { "" };
                println!("{}  {}{marker}", profile.id, profile.title);
            }
        }
        ProfileCommands::Show { id } => {
            let profile = store.get(parse_id(&id)?)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileCommands::Create {
            title,
            file,
            settings,
        } => {
            let settings = parse_settings(file.as_deref(), settings.as_deref())?;
            let profile = store.create(title, settings)?;
            println!("Created profile {} '{}'", profile.id, profile.title);
        }
        ProfileCommands::Duplicate { id } => {
            let copy = store.duplicate(parse_id(&id)?)?;
            println!("Created profile {} '{}'", copy.id, copy.title);
        }
        ProfileCommands::Update {
            id,
            title,
            file,
            settings,
        } => {
            let settings = parse_settings(file.as_deref(), settings.as_deref())?;
            let profile = store.update(parse_id(&id)?, title, settings)?;
            println!("Updated profile {}", profile.id);
        }
        ProfileCommands::Delete { id } => {
            engine.delete_profile(parse_id(&id)?)?;
            println!("Deleted profile {id}");
        }
        ProfileCommands::Use { id } => {
            let id = parse_id(&id)?;
            engine.activate(id)?;
            println!("Activated profile {id}");
        }
        ProfileCommands::Restore => {
            engine.restore_original()?;
            println!("Restored original configuration");
        }
    }
    Ok(())
}
