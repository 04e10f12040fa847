//! Shared types for the stratum scanner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Filename suffix marking an artifact as present but inactive.
///
/// The external CLI discovers artifacts by filename convention only, so
/// the disabled state must survive as a rename (`foo.md` ->
/// `foo.md.disabled`), not as an internal flag.
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Scope where a definition was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// User-global (~/.claude/, ~/.claude.json, ~/.mcp.json)
    User,
    /// Project (.claude/, .mcp.json in repo root)
    Project,
    /// Project-local overrides (.claude/settings.local.json) - gitignored
    Local,
    /// Provided by a user-scoped plugin install
    PluginUser,
    /// Provided by a project-local plugin install
    PluginLocal,
}

impl Scope {
    /// Precedence rank for authoring capability (higher wins).
    ///
    /// Plugin scopes rank zero: they are visible but never become the
    /// editable definition of an entity.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            Self::Local => 3,
            Self::Project => 2,
            Self::User => 1,
            Self::PluginUser | Self::PluginLocal => 0,
        }
    }

    /// Whether this scope belongs to a plugin install
    #[must_use]
    pub fn is_plugin(self) -> bool {
        matches!(self, Self::PluginUser | Self::PluginLocal)
    }

    /// Whether definitions at this scope accept rename/write operations
    #[must_use]
    pub fn is_writable(self) -> bool {
        !self.is_plugin()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Project => write!(f, "project"),
            Self::Local => write!(f, "local"),
            Self::PluginUser => write!(f, "plugin-user"),
            Self::PluginLocal => write!(f, "plugin-local"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "global" => Ok(Scope::User),
            "project" => Ok(Scope::Project),
            "local" => Ok(Scope::Local),
            "plugin-user" => Ok(Scope::PluginUser),
            "plugin-local" => Ok(Scope::PluginLocal),
            _ => Err(format!("Invalid scope: {s}")),
        }
    }
}

/// Kind of configuration entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Command,
    Agent,
    Skill,
    Memory,
    Hook,
    McpServer,
    Plugin,
}

impl EntityKind {
    /// Human-readable display name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Agent => "agent",
            Self::Skill => "skill",
            Self::Memory => "memory file",
            Self::Hook => "hook",
            Self::McpServer => "MCP server",
            Self::Plugin => "plugin",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" | "commands" => Ok(Self::Command),
            "agent" | "agents" => Ok(Self::Agent),
            "skill" | "skills" => Ok(Self::Skill),
            "memory" => Ok(Self::Memory),
            "hook" | "hooks" => Ok(Self::Hook),
            "mcp" | "mcp-server" | "mcp-servers" => Ok(Self::McpServer),
            "plugin" | "plugins" => Ok(Self::Plugin),
            _ => Err(format!("Invalid entity kind: {s}")),
        }
    }
}

/// Where a plugin-provided definition came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginOrigin {
    /// Plugin key (e.g. "notifier@official")
    pub plugin: String,
    /// Whether the owning plugin is currently enabled
    pub enabled: bool,
}

/// A single per-scope record for one logical entity.
///
/// Invariant: within one scope, a logical name has at most one
/// definition. The scanner emits these raw; merging is the resolver's
/// job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    /// Entity kind
    pub kind: EntityKind,
    /// Logical name, unique within its kind and scope
    pub name: String,
    /// Scope this definition was found at
    pub scope: Scope,
    /// Backing file (or containing file for list-based entities)
    pub path: PathBuf,
    /// Raw content for markdown artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Structured config for MCP servers, hooks, and plugins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    /// Short description extracted from frontmatter, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the backing artifact exists on disk
    pub exists: bool,
    /// Own-scope disable marker (rename marker or disabled list entry)
    pub disabled: bool,
    /// A strictly-higher-precedence layer turns this capability off
    /// (owning plugin disabled, or a higher layer's disable list)
    #[serde(default)]
    pub suppressed: bool,
    /// Owning plugin, for plugin-scope definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<PluginOrigin>,
    /// Last modification time of the backing file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    /// SHA256 of the raw content, when read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Per-item failure (unreadable file, malformed structured content)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Definition {
    /// Create a definition with the common fields set; the optional
    /// metadata defaults to empty.
    #[must_use]
    pub fn new(kind: EntityKind, name: impl Into<String>, scope: Scope, path: PathBuf) -> Self {
        Self {
            kind,
            name: name.into(),
            scope,
            path,
            content: None,
            config: None,
            description: None,
            exists: true,
            disabled: false,
            suppressed: false,
            plugin: None,
            modified_at: None,
            sha256: None,
            error: None,
        }
    }
}

/// Split a file name carrying an optional disable marker.
///
/// Returns the logical stem and whether the marker was present, or
/// `None` when the name does not match `<stem><ext>` /
/// `<stem><ext>.disabled`.
#[must_use]
pub fn split_marker<'a>(file_name: &'a str, extension: &str) -> Option<(&'a str, bool)> {
    let disabled_ext = format!("{extension}{DISABLED_SUFFIX}");
    if let Some(stem) = file_name.strip_suffix(&disabled_ext) {
        Some((stem, true))
    } else if let Some(stem) = file_name.strip_suffix(extension) {
        Some((stem, false))
    } else {
        None
    }
}

/// The disabled-marker sibling of an active artifact path
#[must_use]
pub fn disabled_variant(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(DISABLED_SUFFIX);
    path.with_file_name(name)
}

/// The active sibling of a disabled artifact path, if it carries the marker
#[must_use]
pub fn enabled_variant(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    let stem = name.strip_suffix(DISABLED_SUFFIX)?;
    Some(path.with_file_name(stem.to_string()))
}
