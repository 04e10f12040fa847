//! Settings file reading
//!
//! One `SettingsLayer` per settings file (`settings.json` /
//! `settings.local.json`), carrying the keys the layering engine cares
//! about. A malformed file is reported on the layer, not raised, so a
//! broken local override never aborts a whole scan.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed view of a single settings file
#[derive(Debug, Clone, Default)]
pub struct SettingsLayer {
    /// File the layer was read from
    pub path: PathBuf,
    /// Whether the file exists
    pub exists: bool,
    /// `enabledPlugins` map (plugin key -> enabled)
    pub enabled_plugins: HashMap<String, bool>,
    /// `enabledMcpjsonServers` list
    pub enabled_mcpjson_servers: Vec<String>,
    /// `disabledMcpjsonServers` list
    pub disabled_mcpjson_servers: Vec<String>,
    /// `disabledMcpServers` list (direct servers)
    pub disabled_mcp_servers: Vec<String>,
    /// Raw `hooks` object, when present
    pub hooks: Option<Value>,
    /// Parse failure for an existing file
    pub error: Option<String>,
}

impl SettingsLayer {
    /// Read a settings file into a layer.
    ///
    /// A missing file yields an empty layer with `exists == false`; an
    /// unparsable file yields `exists == true` plus `error`.
    #[must_use]
    pub fn read(path: &Path) -> Self {
        let mut layer = Self {
            path: path.to_path_buf(),
            ..Self::default()
        };

        if !path.exists() {
            return layer;
        }
        layer.exists = true;

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                layer.error = Some(format!("Failed to read {}: {e}", path.display()));
                return layer;
            }
        };

        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                layer.error = Some(format!("Failed to parse {}: {e}", path.display()));
                return layer;
            }
        };

        layer.enabled_plugins = extract_bool_map(&value, "enabledPlugins");
        layer.enabled_mcpjson_servers = extract_string_array(&value, "enabledMcpjsonServers");
        layer.disabled_mcpjson_servers = extract_string_array(&value, "disabledMcpjsonServers");
        layer.disabled_mcp_servers = extract_string_array(&value, "disabledMcpServers");
        layer.hooks = value.get("hooks").cloned();
        layer
    }

    /// Enabled state recorded for a plugin key; absent means enabled
    #[must_use]
    pub fn plugin_enabled(&self, plugin_key: &str) -> bool {
        self.enabled_plugins.get(plugin_key).copied().unwrap_or(true)
    }
}

/// Extract a string array field from a JSON value
#[must_use]
pub fn extract_string_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn extract_bool_map(value: &Value, key: &str) -> HashMap<String, bool> {
    value
        .get(key)
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default()
}
