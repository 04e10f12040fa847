//! Well-known Claude Code configuration locations
//!
//! Every scanner and mutation path is derived from a [`ClaudeLayout`]
//! value instead of reaching for the home directory directly, so tests
//! can run against a sandbox home.

use crate::error::{ScanError, ScanResult};
use std::path::{Path, PathBuf};

/// Anchors for the tool-defined configuration layout
#[derive(Debug, Clone)]
pub struct ClaudeLayout {
    /// Home directory (owns `.claude/`, `.claude.json`, `.mcp.json`)
    pub home: PathBuf,
}

impl ClaudeLayout {
    /// Layout rooted at an explicit home directory
    #[must_use]
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Layout rooted at the current user's home directory
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn discover() -> ScanResult<Self> {
        let home = dirs::home_dir().ok_or(ScanError::HomeNotFound)?;
        Ok(Self { home })
    }

    /// `~/.claude`
    #[must_use]
    pub fn claude_dir(&self) -> PathBuf {
        self.home.join(".claude")
    }

    /// User-global live settings file: `~/.claude/settings.json`
    #[must_use]
    pub fn user_settings(&self) -> PathBuf {
        self.claude_dir().join("settings.json")
    }

    /// Project settings file: `<project>/.claude/settings.json`
    #[must_use]
    pub fn project_settings(project: &Path) -> PathBuf {
        project.join(".claude").join("settings.json")
    }

    /// Project-local settings file: `<project>/.claude/settings.local.json`
    #[must_use]
    pub fn local_settings(project: &Path) -> PathBuf {
        project.join(".claude").join("settings.local.json")
    }

    /// Direct MCP servers and projects map: `~/.claude.json`
    #[must_use]
    pub fn claude_json(&self) -> PathBuf {
        self.home.join(".claude.json")
    }

    /// User mcpjson servers: `~/.mcp.json`
    #[must_use]
    pub fn user_mcp_json(&self) -> PathBuf {
        self.home.join(".mcp.json")
    }

    /// Project mcpjson servers: `<project>/.mcp.json`
    #[must_use]
    pub fn project_mcp_json(project: &Path) -> PathBuf {
        project.join(".mcp.json")
    }

    /// `~/.claude/commands`
    #[must_use]
    pub fn user_commands_dir(&self) -> PathBuf {
        self.claude_dir().join("commands")
    }

    /// `~/.claude/agents`
    #[must_use]
    pub fn user_agents_dir(&self) -> PathBuf {
        self.claude_dir().join("agents")
    }

    /// `~/.claude/skills`
    #[must_use]
    pub fn user_skills_dir(&self) -> PathBuf {
        self.claude_dir().join("skills")
    }

    /// Artifact directory under a project's `.claude/`
    #[must_use]
    pub fn project_artifact_dir(project: &Path, dir: &str) -> PathBuf {
        project.join(".claude").join(dir)
    }

    /// Global memory file: `~/.claude/CLAUDE.md`
    #[must_use]
    pub fn user_memory(&self) -> PathBuf {
        self.claude_dir().join("CLAUDE.md")
    }

    /// Project memory file: `<project>/CLAUDE.md`
    #[must_use]
    pub fn project_memory(project: &Path) -> PathBuf {
        project.join("CLAUDE.md")
    }

    /// `~/.claude/plugins`
    #[must_use]
    pub fn plugins_dir(&self) -> PathBuf {
        self.claude_dir().join("plugins")
    }

    /// Install registry: `~/.claude/plugins/installed_plugins.json`
    #[must_use]
    pub fn installed_plugins_file(&self) -> PathBuf {
        self.plugins_dir().join("installed_plugins.json")
    }

    /// Marketplace registry: `~/.claude/plugins/known_marketplaces.json`
    #[must_use]
    pub fn known_marketplaces_file(&self) -> PathBuf {
        self.plugins_dir().join("known_marketplaces.json")
    }

    /// Settings file that records `enabledPlugins` for a plugin install.
    ///
    /// User-scope installs live in the user settings; local-scope
    /// installs live in the owning project's `settings.local.json`.
    /// Returns `None` when a local install has no recorded project.
    #[must_use]
    pub fn plugin_enablement_settings(
        &self,
        scope: &str,
        project_path: Option<&Path>,
    ) -> Option<PathBuf> {
        if scope == "local" {
            project_path.map(Self::local_settings)
        } else {
            Some(self.user_settings())
        }
    }
}
