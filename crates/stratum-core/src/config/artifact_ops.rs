//! Mutations for file-backed artifacts: commands, agents, skills, memory
//!
//! Writes respect the current marker state (content written to the
//! disabled variant stays disabled), deletes remove both variants, and
//! toggles go through the rename protocol.

use super::error::{ConfigError, ConfigResult};
use crate::toggle::ToggleOps;
use crate::util::validate_name;
use std::fs;
use std::path::{Path, PathBuf};
use stratum_scanner::types::{disabled_variant, EntityKind, Scope};
use stratum_scanner::ClaudeLayout;

/// Mutations for markdown-backed entities
pub struct ArtifactOps<'a> {
    layout: &'a ClaudeLayout,
    toggles: &'a ToggleOps,
}

impl<'a> ArtifactOps<'a> {
    /// Create artifact operations over a layout
    #[must_use]
    pub fn new(layout: &'a ClaudeLayout, toggles: &'a ToggleOps) -> Self {
        Self { layout, toggles }
    }

    /// Active-variant path for an artifact at a scope
    ///
    /// # Errors
    /// Returns a validation error for plugin scopes, unsupported kinds,
    /// or a missing project path
    pub fn active_path(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
    ) -> ConfigResult<PathBuf> {
        validate_name(name)?;

        if scope.is_plugin() {
            return Err(ConfigError::NotControllable {
                kind: kind.display_name().to_string(),
                name: name.to_string(),
            });
        }

        let base = self.scope_base(scope, project)?;
        let path = match kind {
            EntityKind::Command => base.join("commands").join(format!("{name}.md")),
            EntityKind::Agent => base.join("agents").join(format!("{name}.md")),
            EntityKind::Skill => base.join("skills").join(name).join("SKILL.md"),
            EntityKind::Memory => match scope {
                Scope::User => self.layout.user_memory(),
                _ => {
                    let project = project.ok_or_else(|| {
                        ConfigError::Validation(
                            "project path required for project memory".to_string(),
                        )
                    })?;
                    ClaudeLayout::project_memory(project)
                }
            },
            other => {
                return Err(ConfigError::Validation(format!(
                    "{other} is not a file-backed artifact"
                )))
            }
        };
        Ok(path)
    }

    /// Create or overwrite an artifact's content, preserving its
    /// current enabled/disabled marker state.
    pub fn write(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
        content: &str,
    ) -> ConfigResult<PathBuf> {
        let active = self.active_path(kind, name, scope, project)?;
        let marked = disabled_variant(&active);

        let target = if marked.exists() && !active.exists() {
            marked
        } else {
            active
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(&target, content).map_err(|e| ConfigError::io(&target, e))?;
        Ok(target)
    }

    /// Delete an artifact (both marker variants). Skill directories are
    /// pruned when emptied.
    pub fn delete(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
    ) -> ConfigResult<()> {
        let active = self.active_path(kind, name, scope, project)?;
        let marked = disabled_variant(&active);

        let mut removed = false;
        for path in [&active, &marked] {
            if path.exists() {
                fs::remove_file(path).map_err(|e| ConfigError::io(path, e))?;
                removed = true;
            }
        }

        if !removed {
            return Err(ConfigError::NotFound {
                kind: kind.display_name().to_string(),
                name: name.to_string(),
            });
        }

        if kind == EntityKind::Skill {
            if let Some(skill_dir) = active.parent() {
                let is_empty = fs::read_dir(skill_dir)
                    .map(|mut entries| entries.next().is_none())
                    .unwrap_or(false);
                if is_empty {
                    let _ = fs::remove_dir(skill_dir);
                }
            }
        }

        Ok(())
    }

    /// Toggle an artifact's disable marker
    pub fn toggle(
        &self,
        kind: EntityKind,
        name: &str,
        scope: Scope,
        project: Option<&Path>,
        disabled: bool,
    ) -> ConfigResult<()> {
        let active = self.active_path(kind, name, scope, project)?;
        self.toggles.set_disabled(&active, disabled)?;
        Ok(())
    }

    fn scope_base(&self, scope: Scope, project: Option<&Path>) -> ConfigResult<PathBuf> {
        match scope {
            Scope::User => Ok(self.layout.claude_dir()),
            Scope::Project | Scope::Local => {
                let project = project.ok_or_else(|| {
                    ConfigError::Validation(
                        "project path required for project/local scope".to_string(),
                    )
                })?;
                Ok(project.join(".claude"))
            }
            Scope::PluginUser | Scope::PluginLocal => Err(ConfigError::Validation(
                "plugin scopes have no writable base".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ops_fixture() -> (TempDir, ClaudeLayout, ToggleOps) {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());
        (tmp, layout, ToggleOps::new())
    }

    #[test]
    fn test_write_then_delete_command() {
        let (tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);

        let path = ops
            .write(EntityKind::Command, "review", Scope::User, None, "body")
            .unwrap();
        assert_eq!(path, tmp.path().join(".claude/commands/review.md"));
        assert!(path.exists());

        ops.delete(EntityKind::Command, "review", Scope::User, None)
            .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_preserves_disabled_marker() {
        let (tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);
        let marked = tmp.path().join(".claude/agents/helper.md.disabled");
        fs::create_dir_all(marked.parent().unwrap()).unwrap();
        fs::write(&marked, "old").unwrap();

        let written = ops
            .write(EntityKind::Agent, "helper", Scope::User, None, "new")
            .unwrap();
        assert_eq!(written, marked);
        assert!(!tmp.path().join(".claude/agents/helper.md").exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);
        assert!(matches!(
            ops.delete(EntityKind::Command, "ghost", Scope::User, None),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_skill_prunes_empty_dir() {
        let (tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);
        ops.write(EntityKind::Skill, "search", Scope::User, None, "skill body")
            .unwrap();

        let skill_dir = tmp.path().join(".claude/skills/search");
        assert!(skill_dir.exists());
        ops.delete(EntityKind::Skill, "search", Scope::User, None)
            .unwrap();
        assert!(!skill_dir.exists());
    }

    #[test]
    fn test_plugin_scope_rejected() {
        let (_tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);
        assert!(matches!(
            ops.toggle(EntityKind::Command, "x", Scope::PluginUser, None, true),
            Err(ConfigError::NotControllable { .. })
        ));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let (_tmp, layout, toggles) = ops_fixture();
        let ops = ArtifactOps::new(&layout, &toggles);
        assert!(matches!(
            ops.write(EntityKind::Command, "../escape", Scope::User, None, ""),
            Err(ConfigError::Validation(_))
        ));
    }
}
