//! Stratum CLI - layered configuration manager for Claude Code
//!
//! Provides `stratum scan`, `stratum toggle`, `stratum profile`, and
//! `stratum marketplace` commands over the core engine.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stratum_scanner::ClaudeLayout;

use commands::marketplace::MarketplaceCommands;
use commands::profile::ProfileCommands;

#[derive(Parser)]
#[command(name = "stratum")]
#[command(about = "Stratum - layered configuration manager for Claude Code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan configuration entities and print their effective state
    Scan {
        /// Entity kind (commands, agents, skills, memory, hooks, mcp, plugins)
        kind: String,

        /// Project directory providing project/local scope
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enable or disable an entity
    Toggle {
        /// Entity kind
        kind: String,

        /// Entity name
        name: String,

        /// Disable instead of enable
        #[arg(long, conflicts_with = "on")]
        off: bool,

        /// Enable (the default)
        #[arg(long)]
        on: bool,

        /// Scope of the definition (user, project, local)
        #[arg(short, long, default_value = "user")]
        scope: String,

        /// Project directory for project/local scope
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Treat the MCP server as a direct entry in ~/.claude.json
        #[arg(long)]
        direct: bool,
    },
    /// Create or overwrite an entity definition
    Write {
        /// Entity kind
        kind: String,

        /// Entity name
        name: String,

        /// Read content from a file
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Inline content
        #[arg(short, long)]
        content: Option<String>,

        /// Scope to write at
        #[arg(short, long, default_value = "user")]
        scope: String,

        /// Project directory for project/local scope
        #[arg(short, long)]
        project: Option<PathBuf>,
    },
    /// Delete an entity definition
    Delete {
        /// Entity kind
        kind: String,

        /// Entity name
        name: String,

        /// Scope of the definition
        #[arg(short, long, default_value = "user")]
        scope: String,

        /// Project directory for project/local scope
        #[arg(short, long)]
        project: Option<PathBuf>,
    },
    /// Manage configuration profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Inspect known marketplaces
    Marketplace {
        #[command(subcommand)]
        action: MarketplaceCommands,
    },
}

fn layout() -> Result<ClaudeLayout> {
    if let Some(home) = std::env::var_os("STRATUM_HOME") {
        return Ok(ClaudeLayout::from_home(PathBuf::from(home)));
    }
    ClaudeLayout::discover().context("Could not determine home directory")
}

fn config_dir(layout: &ClaudeLayout) -> PathBuf {
    layout.home.join(".stratum")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let layout = layout()?;

    match cli.command {
        Commands::Scan {
            kind,
            project,
            json,
        } => commands::entity::scan(&layout, &kind, project.as_deref(), json),
        Commands::Toggle {
            kind,
            name,
            off,
            on: _,
            scope,
            project,
            direct,
        } => commands::entity::toggle(
            &layout,
            &kind,
            &name,
            &scope,
            project.as_deref(),
            off,
            direct,
        ),
        Commands::Write {
            kind,
            name,
            file,
            content,
            scope,
            project,
        } => commands::entity::write(
            &layout,
            &kind,
            &name,
            &scope,
            project.as_deref(),
            file.as_deref(),
            content.as_deref(),
        ),
        Commands::Delete {
            kind,
            name,
            scope,
            project,
        } => commands::entity::delete(&layout, &kind, &name, &scope, project.as_deref()),
        Commands::Profile { action } => {
            let config = config_dir(&layout);
            commands::profile::run(&layout, &config, action)
        }
        Commands::Marketplace { action } => commands::marketplace::run(&layout, action),
    }
}
