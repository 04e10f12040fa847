//! Entity scan and mutation commands

use anyhow::{bail, Context, Result};
use std::path::Path;
use stratum_core::config::{EntityOps, McpOps};
use stratum_scanner::types::{EntityKind, Scope};
use stratum_scanner::{ClaudeLayout, EffectiveView, Scanner};

fn parse_kind(kind: &str) -> Result<EntityKind> {
    kind.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_scope(scope: &str) -> Result<Scope> {
    scope.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// `stratum scan <kind>`
pub fn scan(layout: &ClaudeLayout, kind: &str, project: Option<&Path>, json: bool) -> Result<()> {
    let kind = parse_kind(kind)?;
    let scanner = Scanner::new(layout.clone());

    let views = match kind {
        EntityKind::Command => scanner.scan_commands(project)?,
        EntityKind::Agent => scanner.scan_agents(project)?,
        EntityKind::Skill => scanner.scan_skills(project)?,
        EntityKind::Memory => scanner.scan_memory()?,
        EntityKind::Hook => scanner.scan_hooks(project)?,
        EntityKind::McpServer => scanner.scan_mcp_servers(project)?,
        EntityKind::Plugin => scanner.scan_plugins()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No {kind} entities found");
        return Ok(());
    }

    for view in &views {
        print_view(view);
    }
    Ok(())
}

fn print_view(view: &EffectiveView) {
    let control = if view.controllable { "" } else { " [read-only]" };
    println!("{:30} {:18} {}{}", view.name, view.state.to_string(), view.scope, control);
    if let Some(error) = &view.error {
        println!("{:30} error: {error}", "");
    }
}

/// `stratum toggle <kind> <name>`
pub fn toggle(
    layout: &ClaudeLayout,
    kind: &str,
    name: &str,
    scope: &str,
    project: Option<&Path>,
    disabled: bool,
    direct: bool,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let scope = parse_scope(scope)?;

    if direct {
        if kind != EntityKind::McpServer {
            bail!("--direct only applies to MCP servers");
        }
        McpOps::new(layout)
            .set_direct_enabled(name, !disabled, project)
            .with_context(|| format!("Failed to toggle direct MCP server '{name}'"))?;
    } else {
        let ops = EntityOps::new(layout.clone());
        ops.toggle(kind, name, scope, project, disabled)
            .with_context(|| format!("Failed to toggle {kind} '{name}'"))?;
    }

    let state = if disabled { "disabled" } else { "enabled" };
    println!("{kind} '{name}' {state}");
    Ok(())
}

/// `stratum write <kind> <name>`
pub fn write(
    layout: &ClaudeLayout,
    kind: &str,
    name: &str,
    scope: &str,
    project: Option<&Path>,
    file: Option<&Path>,
    content: Option<&str>,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let scope = parse_scope(scope)?;

    let body = match (file, content) {
        (Some(path), None) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, Some(inline)) => inline.to_string(),
        _ => bail!("Provide content with either --file or --content"),
    };

    let ops = EntityOps::new(layout.clone());
    ops.write(kind, name, scope, project, &body)
        .with_context(|| format!("Failed to write {kind} '{name}'"))?;

    println!("Wrote {kind} '{name}' at {scope} scope");
    Ok(())
}

/// `stratum delete <kind> <name>`
pub fn delete(
    layout: &ClaudeLayout,
    kind: &str,
    name: &str,
    scope: &str,
    project: Option<&Path>,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let scope = parse_scope(scope)?;

    let ops = EntityOps::new(layout.clone());
    ops.delete(kind, name, scope, project)
        .with_context(|| format!("Failed to delete {kind} '{name}'"))?;

    println!("Deleted {kind} '{name}'");
    Ok(())
}
