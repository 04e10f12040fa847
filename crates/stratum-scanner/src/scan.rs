//! Main scanner implementation
//!
//! Walks the well-known locations for one entity kind and hands the raw
//! definitions to the resolver. Scans never cache: every call reflects
//! the current state of disk.

use crate::artifacts::{scan_markdown_dir, scan_skills_dir};
use crate::cancel::CancelToken;
use crate::error::{ScanError, ScanResult};
use crate::layout::ClaudeLayout;
use crate::mcp::scan_mcp_servers;
use crate::memory::{scan_project_memory, scan_user_memory};
use crate::plugins::PluginInventory;
use crate::resolve::{resolve, EffectiveView};
use crate::settings::SettingsLayer;
use crate::types::{Definition, EntityKind, Scope};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The main scanner
#[derive(Debug, Clone)]
pub struct Scanner {
    layout: ClaudeLayout,
    cancel: CancelToken,
}

/// Full inventory across every entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub commands: Vec<EffectiveView>,
    pub agents: Vec<EffectiveView>,
    pub skills: Vec<EffectiveView>,
    pub memory: Vec<EffectiveView>,
    pub hooks: Vec<EffectiveView>,
    pub mcp_servers: Vec<EffectiveView>,
    pub plugins: Vec<EffectiveView>,
}

impl Scanner {
    /// Create a scanner over the given layout
    #[must_use]
    pub fn new(layout: ClaudeLayout) -> Self {
        Self {
            layout,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token checked between per-location steps
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The layout this scanner reads from
    #[must_use]
    pub fn layout(&self) -> &ClaudeLayout {
        &self.layout
    }

    fn checkpoint(&self) -> ScanResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        Ok(())
    }

    /// Scan commands across user, project, and plugin scopes
    pub fn scan_commands(&self, project: Option<&Path>) -> ScanResult<Vec<EffectiveView>> {
        Ok(resolve(self.raw_commands(project)?))
    }

    /// Scan agents across user, project, and plugin scopes
    pub fn scan_agents(&self, project: Option<&Path>) -> ScanResult<Vec<EffectiveView>> {
        Ok(resolve(self.raw_agents(project)?))
    }

    /// Scan skills across user, project, and plugin scopes
    pub fn scan_skills(&self, project: Option<&Path>) -> ScanResult<Vec<EffectiveView>> {
        Ok(resolve(self.raw_skills(project)?))
    }

    /// Scan memory files: the global one plus every known project's
    pub fn scan_memory(&self) -> ScanResult<Vec<EffectiveView>> {
        let mut definitions = scan_user_memory(&self.layout);
        for project in self.known_projects()? {
            self.checkpoint()?;
            definitions.extend(scan_project_memory(&project));
        }
        Ok(resolve(definitions))
    }

    /// Scan hook configuration from the settings files
    pub fn scan_hooks(&self, project: Option<&Path>) -> ScanResult<Vec<EffectiveView>> {
        let mut definitions = Vec::new();

        definitions.extend(hook_definition(
            &self.layout.user_settings(),
            "user",
            Scope::User,
        ));

        if let Some(project_path) = project {
            self.checkpoint()?;
            let name = project_display_name(project_path);
            definitions.extend(hook_definition(
                &ClaudeLayout::project_settings(project_path),
                &name,
                Scope::Project,
            ));
            definitions.extend(hook_definition(
                &ClaudeLayout::local_settings(project_path),
                &name,
                Scope::Local,
            ));
        }

        Ok(resolve(definitions))
    }

    /// Scan MCP servers across every declaring layer
    pub fn scan_mcp_servers(&self, project: Option<&Path>) -> ScanResult<Vec<EffectiveView>> {
        self.checkpoint()?;
        let inventory = PluginInventory::scan(&self.layout)?;
        self.checkpoint()?;
        Ok(resolve(scan_mcp_servers(&self.layout, &inventory, project)))
    }

    /// Scan installed plugins
    pub fn scan_plugins(&self) -> ScanResult<Vec<EffectiveView>> {
        let inventory = PluginInventory::scan(&self.layout)?;
        Ok(resolve(inventory.plugin_definitions()))
    }

    /// Project paths recorded in `~/.claude.json`
    pub fn known_projects(&self) -> ScanResult<Vec<PathBuf>> {
        let path = self.layout.claude_json();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let mut projects: Vec<PathBuf> = value
            .get("projects")
            .and_then(serde_json::Value::as_object)
            .map(|obj| obj.keys().map(PathBuf::from).collect())
            .unwrap_or_default();
        projects.sort();
        Ok(projects)
    }

    /// Full scan across every kind and every known project.
    ///
    /// Per-project artifact scans fan out on the rayon pool; the cancel
    /// token is observed between locations, so a superseded scan stops
    /// promptly and its partial output is discarded by the caller.
    pub fn scan_all(&self) -> ScanResult<Inventory> {
        let projects = self.known_projects()?;
        self.checkpoint()?;
        let inventory = PluginInventory::scan(&self.layout)?;

        let mut commands = scan_markdown_dir(
            &self.layout.user_commands_dir(),
            EntityKind::Command,
            Scope::User,
        );
        let mut agents = scan_markdown_dir(
            &self.layout.user_agents_dir(),
            EntityKind::Agent,
            Scope::User,
        );
        let mut skills = scan_skills_dir(&self.layout.user_skills_dir(), Scope::User);
        self.checkpoint()?;

        let per_project: Vec<ScanResult<ProjectArtifacts>> = projects
            .par_iter()
            .map(|project| self.scan_project_artifacts(project))
            .collect();

        let mut memory = scan_user_memory(&self.layout);
        for result in per_project {
            let artifacts = result?;
            commands.extend(artifacts.commands);
            agents.extend(artifacts.agents);
            skills.extend(artifacts.skills);
            memory.extend(artifacts.memory);
        }

        commands.extend(inventory.artifact_definitions(EntityKind::Command));
        agents.extend(inventory.artifact_definitions(EntityKind::Agent));
        skills.extend(inventory.skill_definitions());
        self.checkpoint()?;

        Ok(Inventory {
            commands: resolve(commands),
            agents: resolve(agents),
            skills: resolve(skills),
            memory: resolve(memory),
            hooks: self.scan_hooks(None)?,
            mcp_servers: resolve(scan_mcp_servers(&self.layout, &inventory, None)),
            plugins: resolve(inventory.plugin_definitions()),
        })
    }

    fn scan_project_artifacts(&self, project: &Path) -> ScanResult<ProjectArtifacts> {
        self.checkpoint()?;
        Ok(ProjectArtifacts {
            commands: scan_markdown_dir(
                &ClaudeLayout::project_artifact_dir(project, "commands"),
                EntityKind::Command,
                Scope::Project,
            ),
            agents: scan_markdown_dir(
                &ClaudeLayout::project_artifact_dir(project, "agents"),
                EntityKind::Agent,
                Scope::Project,
            ),
            skills: scan_skills_dir(
                &ClaudeLayout::project_artifact_dir(project, "skills"),
                Scope::Project,
            ),
            memory: scan_project_memory(project),
        })
    }

    fn raw_commands(&self, project: Option<&Path>) -> ScanResult<Vec<Definition>> {
        self.raw_markdown_kind(project, EntityKind::Command, "commands")
    }

    fn raw_agents(&self, project: Option<&Path>) -> ScanResult<Vec<Definition>> {
        self.raw_markdown_kind(project, EntityKind::Agent, "agents")
    }

    fn raw_markdown_kind(
        &self,
        project: Option<&Path>,
        kind: EntityKind,
        subdir: &str,
    ) -> ScanResult<Vec<Definition>> {
        let user_dir = self.layout.claude_dir().join(subdir);
        let mut definitions = scan_markdown_dir(&user_dir, kind, Scope::User);
        self.checkpoint()?;

        if let Some(project_path) = project {
            definitions.extend(scan_markdown_dir(
                &ClaudeLayout::project_artifact_dir(project_path, subdir),
                kind,
                Scope::Project,
            ));
            self.checkpoint()?;
        }

        let inventory = PluginInventory::scan(&self.layout)?;
        definitions.extend(inventory.artifact_definitions(kind));
        Ok(definitions)
    }

    fn raw_skills(&self, project: Option<&Path>) -> ScanResult<Vec<Definition>> {
        let mut definitions = scan_skills_dir(&self.layout.user_skills_dir(), Scope::User);
        self.checkpoint()?;

        if let Some(project_path) = project {
            definitions.extend(scan_skills_dir(
                &ClaudeLayout::project_artifact_dir(project_path, "skills"),
                Scope::Project,
            ));
            self.checkpoint()?;
        }

        let inventory = PluginInventory::scan(&self.layout)?;
        definitions.extend(inventory.skill_definitions());
        Ok(definitions)
    }
}

struct ProjectArtifacts {
    commands: Vec<Definition>,
    agents: Vec<Definition>,
    skills: Vec<Definition>,
    memory: Vec<Definition>,
}

/// Build a hook definition for one settings file, when it carries hooks
fn hook_definition(path: &Path, name: &str, scope: Scope) -> Option<Definition> {
    let layer = SettingsLayer::read(path);
    if !layer.exists {
        return None;
    }

    if let Some(error) = layer.error {
        let mut def = Definition::new(EntityKind::Hook, name, scope, path.to_path_buf());
        def.error = Some(error);
        return Some(def);
    }

    let hooks = layer.hooks?;
    let mut def = Definition::new(EntityKind::Hook, name, scope, path.to_path_buf());
    def.config = Some(hooks);
    Some(def)
}

fn project_display_name(project: &Path) -> String {
    project
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string()
}
