//! MCP server mutations
//!
//! mcpjson-style servers live in an `mcpServers` object inside
//! `~/.mcp.json` (user) or `<project>/.mcp.json` (project-local) and
//! toggle through the `enabledMcpjsonServers` / `disabledMcpjsonServers`
//! settings arrays. Direct servers live inline in `~/.claude.json` and
//! toggle through `disabledMcpServers`.

use super::error::{ConfigError, ConfigResult};
use crate::util::{atomic_write, validate_name};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use stratum_scanner::ClaudeLayout;

/// MCP server mutations over a layout
pub struct McpOps<'a> {
    layout: &'a ClaudeLayout,
}

impl<'a> McpOps<'a> {
    /// Create MCP operations over a layout
    #[must_use]
    pub fn new(layout: &'a ClaudeLayout) -> Self {
        Self { layout }
    }

    fn servers_file(&self, project: Option<&Path>) -> PathBuf {
        project.map_or_else(
            || self.layout.user_mcp_json(),
            ClaudeLayout::project_mcp_json,
        )
    }

    /// Create or update a server entry in the mcpjson file
    pub fn upsert_server(
        &self,
        name: &str,
        config: Value,
        project: Option<&Path>,
    ) -> ConfigResult<()> {
        validate_name(name)?;
        let path = self.servers_file(project);
        let mut value = read_json_object(&path)?;

        let servers = value
            .entry("mcpServers".to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ConfigError::malformed(&path, "mcpServers is not an object"))?;

        servers.insert(name.to_string(), config);
        write_json_object(&path, &value)
    }

    /// Remove a server entry and scrub its name from the settings
    /// enable/disable arrays.
    pub fn remove_server(&self, name: &str, project: Option<&Path>) -> ConfigResult<()> {
        validate_name(name)?;
        let path = self.servers_file(project);

        if !path.exists() {
            return Err(ConfigError::NotFound {
                kind: "MCP server".to_string(),
                name: name.to_string(),
            });
        }

        let mut value = read_json_object(&path)?;
        let servers = value
            .get_mut("mcpServers")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ConfigError::NotFound {
                kind: "MCP server".to_string(),
                name: name.to_string(),
            })?;

        if servers.remove(name).is_none() {
            return Err(ConfigError::NotFound {
                kind: "MCP server".to_string(),
                name: name.to_string(),
            });
        }
        if servers.is_empty() {
            value.remove("mcpServers");
        }
        write_json_object(&path, &value)?;

        self.scrub_from_settings(name, project)
    }

    /// Enable/disable an mcpjson server via the settings arrays.
    ///
    /// With a project selected, the write lands in the project's
    /// `settings.local.json` (highest-priority, gitignored); otherwise
    /// in the user settings.
    pub fn set_enabled(&self, name: &str, enabled: bool, project: Option<&Path>) -> ConfigResult<()> {
        validate_name(name)?;
        let settings_path = project.map_or_else(
            || self.layout.user_settings(),
            ClaudeLayout::local_settings,
        );

        let mut value = read_json_object(&settings_path)?;

        for (key, include) in [
            ("enabledMcpjsonServers", enabled),
            ("disabledMcpjsonServers", !enabled),
        ] {
            let arr = value
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .ok_or_else(|| {
                    ConfigError::malformed(&settings_path, format!("{key} is not an array"))
                })?;
            arr.retain(|v| v.as_str() != Some(name));
            if include {
                arr.push(Value::String(name.to_string()));
            }
        }

        write_json_object(&settings_path, &value)
    }

    /// Enable/disable a direct server via `disabledMcpServers` in
    /// `~/.claude.json` (root level, or the project object when a
    /// project is selected).
    pub fn set_direct_enabled(
        &self,
        name: &str,
        enabled: bool,
        project: Option<&Path>,
    ) -> ConfigResult<()> {
        validate_name(name)?;
        let path = self.layout.claude_json();
        let mut value = read_json_object(&path)?;

        let target = match project {
            Some(project_path) => {
                let key = project_path.to_string_lossy().into_owned();
                value
                    .entry("projects".to_string())
                    .or_insert_with(|| Value::Object(Map::new()))
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::malformed(&path, "projects is not an object"))?
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()))
                    .as_object_mut()
                    .ok_or_else(|| {
                        ConfigError::malformed(&path, "project entry is not an object")
                    })?
            }
            None => &mut value,
        };

        let disabled_arr = target
            .entry("disabledMcpServers".to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| ConfigError::malformed(&path, "disabledMcpServers is not an array"))?;

        disabled_arr.retain(|v| v.as_str() != Some(name));
        if !enabled {
            disabled_arr.push(Value::String(name.to_string()));
        }

        write_json_object(&path, &value)
    }

    fn scrub_from_settings(&self, name: &str, project: Option<&Path>) -> ConfigResult<()> {
        let settings_path = project.map_or_else(
            || self.layout.user_settings(),
            ClaudeLayout::local_settings,
        );
        if !settings_path.exists() {
            return Ok(());
        }

        let mut value = read_json_object(&settings_path)?;
        for key in ["enabledMcpjsonServers", "disabledMcpjsonServers"] {
            if let Some(arr) = value.get_mut(key).and_then(Value::as_array_mut) {
                arr.retain(|v| v.as_str() != Some(name));
            }
        }
        write_json_object(&settings_path, &value)
    }
}

fn read_json_object(path: &Path) -> ConfigResult<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::malformed(path, e))?;
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ConfigError::malformed(path, "top level is not an object"))
}

fn write_json_object(path: &Path, value: &Map<String, Value>) -> ConfigResult<()> {
    let content = serde_json::to_string_pretty(&Value::Object(value.clone()))
        .map_err(|e| ConfigError::io(path, e))?;
    atomic_write(path, content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_and_remove_server() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        let ops = McpOps::new(&layout);

        ops.upsert_server("search", json!({"command": "srv"}), None)
            .unwrap();
        let content = fs::read_to_string(layout.user_mcp_json()).unwrap();
        assert!(content.contains("search"));

        ops.remove_server("search", None).unwrap();
        let content = fs::read_to_string(layout.user_mcp_json()).unwrap();
        assert!(!content.contains("search"));
    }

    #[test]
    fn test_remove_missing_server_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        let ops = McpOps::new(&layout);

        assert!(matches!(
            ops.remove_server("ghost", None),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_enabled_rewrites_arrays() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        let ops = McpOps::new(&layout);

        ops.set_enabled("search", false, None).unwrap();
        let value: Value =
            serde_json::from_str(&fs::read_to_string(layout.user_settings()).unwrap()).unwrap();
        assert_eq!(value["disabledMcpjsonServers"], json!(["search"]));
        assert_eq!(value["enabledMcpjsonServers"], json!([]));

        ops.set_enabled("search", true, None).unwrap();
        let value: Value =
            serde_json::from_str(&fs::read_to_string(layout.user_settings()).unwrap()).unwrap();
        assert_eq!(value["enabledMcpjsonServers"], json!(["search"]));
        assert_eq!(value["disabledMcpjsonServers"], json!([]));
    }

    #[test]
    fn test_set_direct_enabled_project_scope() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        let ops = McpOps::new(&layout);
        let project = Path::new("/work/app");

        ops.set_direct_enabled("search", false, Some(project)).unwrap();
        let value: Value =
            serde_json::from_str(&fs::read_to_string(layout.claude_json()).unwrap()).unwrap();
        assert_eq!(
            value["projects"]["/work/app"]["disabledMcpServers"],
            json!(["search"])
        );
    }

    #[test]
    fn test_remove_scrubs_settings_arrays() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        let ops = McpOps::new(&layout);

        ops.upsert_server("search", json!({"command": "srv"}), None)
            .unwrap();
        ops.set_enabled("search", false, None).unwrap();
        ops.remove_server("search", None).unwrap();

        let value: Value =
            serde_json::from_str(&fs::read_to_string(layout.user_settings()).unwrap()).unwrap();
        assert_eq!(value["disabledMcpjsonServers"], json!([]));
    }
}
