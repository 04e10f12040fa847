//! Plugin enablement mutations
//!
//! A plugin's whole enabled state lives in the `enabledPlugins` map of
//! the settings file owning its install scope: user settings for
//! user-scope installs, the project's `settings.local.json` for
//! local-scope installs. Individual plugin artifacts are never toggled.

use super::error::{ConfigError, ConfigResult};
use crate::util::atomic_write;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use stratum_scanner::types::Scope;
use stratum_scanner::ClaudeLayout;

/// Plugin mutations over a layout
pub struct PluginOps<'a> {
    layout: &'a ClaudeLayout,
}

impl<'a> PluginOps<'a> {
    /// Create plugin operations over a layout
    #[must_use]
    pub fn new(layout: &'a ClaudeLayout) -> Self {
        Self { layout }
    }

    /// Record a plugin's enabled state at its install scope
    pub fn set_enabled(
        &self,
        plugin_key: &str,
        enabled: bool,
        scope: Scope,
        project: Option<&Path>,
    ) -> ConfigResult<()> {
        let settings_path = match scope {
            Scope::PluginLocal | Scope::Local => {
                let project = project.ok_or_else(|| {
                    ConfigError::Validation(
                        "project path required for local-scope plugins".to_string(),
                    )
                })?;
                ClaudeLayout::local_settings(project)
            }
            _ => self.layout.user_settings(),
        };

        let mut value = read_settings(&settings_path)?;
        let enabled_plugins = value
            .entry("enabledPlugins".to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| {
                ConfigError::malformed(&settings_path, "enabledPlugins is not an object")
            })?;

        enabled_plugins.insert(plugin_key.to_string(), Value::Bool(enabled));

        let content = serde_json::to_string_pretty(&Value::Object(value))
            .map_err(|e| ConfigError::io(&settings_path, e))?;
        atomic_write(&settings_path, content.as_bytes())?;
        Ok(())
    }
}

fn read_settings(path: &Path) -> ConfigResult<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::malformed(path, e))?;
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ConfigError::malformed(path, "settings is not an object"))
}
