//! MCP server definition scanning
//!
//! Servers are declared redundantly across several layers:
//!
//! - `~/.mcp.json` (user, "mcpjson" style, list-toggled via the
//!   `enabledMcpjsonServers` / `disabledMcpjsonServers` settings arrays)
//! - `~/.claude.json` top-level `mcpServers` (user, "direct" style,
//!   list-toggled via `disabledMcpServers`)
//! - plugin `.mcp.json` files (plugin scope, toggled with the plugin)
//! - `~/.claude.json` `projects[<path>].mcpServers` (project)
//! - `<project>/.mcp.json` (project-local)
//!
//! Each declaration becomes one `Definition`; the resolver folds them.

use crate::layout::ClaudeLayout;
use crate::parser::mcp::mcp_servers_object;
use crate::plugins::PluginInventory;
use crate::settings::{extract_string_array, SettingsLayer};
use crate::types::{Definition, EntityKind, Scope};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Enable/disable bookkeeping gathered from the settings layers
#[derive(Debug, Clone, Default)]
struct McpState {
    enabled_mcpjson: Vec<String>,
    disabled_mcpjson: Vec<String>,
    /// Root-level `disabledMcpServers` from `~/.claude.json` / settings
    root_disabled_direct: Vec<String>,
    /// Per-project `disabledMcpServers`, when a project is selected and
    /// the project object carries the key
    project_disabled_direct: Option<Vec<String>>,
}

impl McpState {
    fn gather(layout: &ClaudeLayout, project: Option<&Path>) -> Self {
        // The effective settings file mirrors the CLI's own lookup:
        // local when present, then project, then user.
        let settings_path = project
            .and_then(|p| {
                let local = ClaudeLayout::local_settings(p);
                if local.exists() {
                    return Some(local);
                }
                let proj = ClaudeLayout::project_settings(p);
                proj.exists().then_some(proj)
            })
            .unwrap_or_else(|| layout.user_settings());

        let layer = SettingsLayer::read(&settings_path);

        let mut state = Self {
            enabled_mcpjson: layer.enabled_mcpjson_servers,
            disabled_mcpjson: layer.disabled_mcpjson_servers,
            root_disabled_direct: layer.disabled_mcp_servers,
            project_disabled_direct: None,
        };

        // Direct-server disable lists live in ~/.claude.json: the
        // project object's list overrides the root list wholesale.
        if let Ok(value) = read_json(&layout.claude_json()) {
            if state.root_disabled_direct.is_empty() {
                state.root_disabled_direct = extract_string_array(&value, "disabledMcpServers");
            }
            if let Some(project_path) = project {
                let key = project_path.to_string_lossy();
                if let Some(project_obj) = value.get("projects").and_then(|p| p.get(key.as_ref()))
                {
                    if project_obj.get("disabledMcpServers").is_some() {
                        state.project_disabled_direct =
                            Some(extract_string_array(project_obj, "disabledMcpServers"));
                    }
                }
            }
        }

        state
    }

    /// Own-scope and higher-layer state for an mcpjson-style server
    fn mcpjson_flags(&self, name: &str) -> (bool, bool) {
        let in_enabled = self.enabled_mcpjson.iter().any(|n| n == name);
        let in_disabled = self.disabled_mcpjson.iter().any(|n| n == name);
        let disabled = in_disabled && !in_enabled;
        let suppressed = in_disabled && in_enabled;
        (disabled, suppressed)
    }

    /// Own-scope and higher-layer state for a direct-style user server
    fn direct_flags(&self, name: &str) -> (bool, bool) {
        if let Some(project_list) = &self.project_disabled_direct {
            // A project-local override turning off an inherited server
            // preserves the user-scope intent: runtime-disabled.
            return (false, project_list.iter().any(|n| n == name));
        }
        (self.root_disabled_direct.iter().any(|n| n == name), false)
    }
}

/// Scan MCP server definitions across every applicable layer
#[must_use]
pub fn scan_mcp_servers(
    layout: &ClaudeLayout,
    inventory: &PluginInventory,
    project: Option<&Path>,
) -> Vec<Definition> {
    let state = McpState::gather(layout, project);
    let mut definitions = Vec::new();

    // User mcpjson servers (~/.mcp.json)
    definitions.extend(scan_servers_file(
        &layout.user_mcp_json(),
        Scope::User,
        |name| state.mcpjson_flags(name),
    ));

    // User direct servers (~/.claude.json top level)
    definitions.extend(scan_servers_file(&layout.claude_json(), Scope::User, |name| {
        state.direct_flags(name)
    }));

    // Plugin-declared servers
    definitions.extend(inventory.mcp_definitions());

    if let Some(project_path) = project {
        // Project servers (~/.claude.json projects[path].mcpServers)
        definitions.extend(scan_project_claude_json(layout, project_path, &state));

        // Project-local servers (<project>/.mcp.json)
        definitions.extend(scan_servers_file(
            &ClaudeLayout::project_mcp_json(project_path),
            Scope::Local,
            |name| state.mcpjson_flags(name),
        ));
    }

    definitions
}

fn scan_servers_file(
    path: &Path,
    scope: Scope,
    flags: impl Fn(&str) -> (bool, bool),
) -> Vec<Definition> {
    if !path.exists() {
        return Vec::new();
    }

    let value = match read_json(path) {
        Ok(value) => value,
        Err(e) => {
            // Surface the broken file as a single malformed definition
            // so callers see it without the batch failing.
            let mut def = Definition::new(
                EntityKind::McpServer,
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                scope,
                path.to_path_buf(),
            );
            def.error = Some(e);
            return vec![def];
        }
    };

    mcp_servers_object(&value)
        .into_iter()
        .map(|(name, config)| {
            let (disabled, suppressed) = flags(&name);
            let mut def =
                Definition::new(EntityKind::McpServer, name, scope, path.to_path_buf());
            def.config = Some(config);
            def.disabled = disabled;
            def.suppressed = suppressed;
            def
        })
        .collect()
}

fn scan_project_claude_json(
    layout: &ClaudeLayout,
    project: &Path,
    state: &McpState,
) -> Vec<Definition> {
    let path = layout.claude_json();
    let Ok(value) = read_json(&path) else {
        return Vec::new();
    };

    let key = project.to_string_lossy();
    let servers = value
        .get("projects")
        .and_then(|p| p.get(key.as_ref()))
        .map(|project_obj| mcp_servers_object(project_obj))
        .unwrap_or_default();

    servers
        .into_iter()
        .map(|(name, config)| {
            let disabled = state
                .project_disabled_direct
                .as_ref()
                .map_or(false, |list| list.iter().any(|n| n == &name));
            let mut def = Definition::new(EntityKind::McpServer, name, Scope::Project, path.clone());
            def.config = Some(config);
            def.disabled = disabled;
            def
        })
        .collect()
}

fn read_json(path: &Path) -> Result<Value, String> {
    if !path.exists() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}
