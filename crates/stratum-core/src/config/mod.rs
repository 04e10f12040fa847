//! Config mutation operations
//!
//! Granular write/delete/toggle operations for individual configuration
//! entities, scoped to a specific definition. This module sits between
//! the scanner (read) and the profile engine (whole-file writes):
//! mutations here are surgical and leave everything else in the file
//! untouched.

mod artifact_ops;
mod error;
mod mcp_ops;
mod plugin_ops;

pub use artifact_ops::ArtifactOps;
pub use error::{ConfigError, ConfigResult};
pub use mcp_ops::McpOps;
pub use plugin_ops::PluginOps;

use crate::toggle::ToggleOps;
use std::path::Path;
use stratum_scanner::types::{EntityKind, Scope};
use stratum_scanner::ClaudeLayout;

/// Entry point dispatching mutations by entity kind
pub struct EntityOps {
    layout: ClaudeLayout,
    toggles: ToggleOps,
}

impl EntityOps {
    /// Create entity operations over a layout
    #[must_use]
    pub fn new(layout: ClaudeLayout) -> Self {
        Self {
            layout,
            toggles: ToggleOps::new(),
        }
    }

    /// The layout mutations are applied to
    #[must_use]
    pub fn layout(&self) -> &ClaudeLayout {
        &self.layout
    }

    /// Write an entity's content at a scope
    pub fn write(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
        content: &str,
    ) -> ConfigResult<()> {
        match kind {
            EntityKind::Command | EntityKind::Agent | EntityKind::Skill | EntityKind::Memory => {
                ArtifactOps::new(&self.layout, &self.toggles)
                    .write(kind, name, scope, project, content)?;
                Ok(())
            }
            EntityKind::McpServer => {
                let config = serde_json::from_str(content).map_err(|e| ConfigError::Malformed {
                    path: Path::new(name).to_path_buf(),
                    message: e.to_string(),
                })?;
                let project = (scope == Scope::Local).then_some(project).flatten();
                McpOps::new(&self.layout).upsert_server(name, config, project)
            }
            EntityKind::Hook | EntityKind::Plugin => Err(ConfigError::Validation(format!(
                "{kind} entities are not written through this interface"
            ))),
        }
    }

    /// Delete an entity's definition at a scope
    pub fn delete(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
    ) -> ConfigResult<()> {
        match kind {
            EntityKind::Command | EntityKind::Agent | EntityKind::Skill | EntityKind::Memory => {
                ArtifactOps::new(&self.layout, &self.toggles).delete(kind, name, scope, project)
            }
            EntityKind::McpServer => {
                let project = (scope == Scope::Local).then_some(project).flatten();
                McpOps::new(&self.layout).remove_server(name, project)
            }
            EntityKind::Hook | EntityKind::Plugin => Err(ConfigError::Validation(format!(
                "{kind} entities are not deleted through this interface"
            ))),
        }
    }

    /// Toggle an entity's disabled state at a scope
    pub fn toggle(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
        disabled: bool,
    ) -> ConfigResult<()> {
        if scope.is_plugin() && kind != EntityKind::Plugin {
            return Err(ConfigError::NotControllable {
                kind: kind.display_name().to_string(),
                name: name.to_string(),
            });
        }

        match kind {
            EntityKind::Command | EntityKind::Agent | EntityKind::Skill | EntityKind::Memory => {
                ArtifactOps::new(&self.layout, &self.toggles)
                    .toggle(kind, name, scope, project, disabled)
            }
            EntityKind::McpServer => {
                McpOps::new(&self.layout).set_enabled(name, !disabled, project)
            }
            EntityKind::Plugin => {
                PluginOps::new(&self.layout).set_enabled(name, !disabled, scope, project)
            }
            EntityKind::Hook => Err(ConfigError::Validation(
                "hooks are toggled by editing their settings file".to_string(),
            )),
        }
    }
}
