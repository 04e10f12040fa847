//! MCP config file parsing
//!
//! Both `~/.mcp.json` and `~/.claude.json` carry an `mcpServers` object
//! mapping server name to config; plugin `.mcp.json` files sometimes
//! omit the wrapper.

use serde_json::{Map, Value};

/// Extract the `mcpServers` object from a parsed config file.
///
/// A missing or non-object `mcpServers` key yields an empty map.
#[must_use]
pub fn mcp_servers_object(value: &Value) -> Map<String, Value> {
    value
        .get("mcpServers")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Extract servers from a plugin `.mcp.json`, tolerating the wrapper
/// being absent (the whole top-level object is then one unnamed server
/// keyed by the plugin name).
#[must_use]
pub fn plugin_mcp_servers(value: &Value, plugin_name: &str) -> Map<String, Value> {
    let servers = mcp_servers_object(value);
    if !servers.is_empty() {
        return servers;
    }

    if value.get("mcpServers").is_none() {
        if let Some(obj) = value.as_object() {
            let mut map = Map::new();
            map.insert(plugin_name.to_string(), Value::Object(obj.clone()));
            return map;
        }
    }

    Map::new()
}
