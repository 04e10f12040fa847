//! Plugin and marketplace scanning
//!
//! Reads the Claude Code plugin registry (`installed_plugins.json`,
//! `known_marketplaces.json`) and the per-scope `enabledPlugins` maps,
//! and exposes plugin-provided artifacts as plugin-scope definitions.

use crate::error::{ScanError, ScanResult};
use crate::layout::ClaudeLayout;
use crate::parser::frontmatter::{extract_description, sha256_hex};
use crate::parser::mcp::plugin_mcp_servers;
use crate::settings::SettingsLayer;
use crate::types::{Definition, EntityKind, PluginOrigin, Scope};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marketplace source types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MarketplaceSource {
    /// GitHub repository
    GitHub { owner: String, repo: String },
    /// Arbitrary git URL
    Url { url: String },
    /// Local path
    Local { path: PathBuf },
}

/// A configured marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marketplace {
    /// Marketplace name
    pub name: String,
    /// Source type and location
    pub source: MarketplaceSource,
    /// Raw recorded location (owner/repo, URL, or path)
    pub location: String,
    /// Whether auto-update is enabled
    #[serde(default)]
    pub auto_update: bool,
}

/// One installed plugin record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPlugin {
    /// Registry key ("plugin-name@marketplace")
    pub key: String,
    /// Plugin name
    pub name: String,
    /// Marketplace it came from
    pub marketplace: Option<String>,
    /// Install scope
    pub scope: Scope,
    /// Whether the plugin is enabled at its scope
    pub enabled: bool,
    /// Install directory
    pub path: PathBuf,
    /// Installed version
    pub version: String,
    /// Project path (for local-scope installs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
}

/// Plugin inventory: marketplaces plus installed plugins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginInventory {
    /// Configured marketplaces
    #[serde(default)]
    pub marketplaces: Vec<Marketplace>,
    /// Installed plugins
    #[serde(default)]
    pub installed: Vec<InstalledPlugin>,
}

// Raw JSON structures for the Claude Code plugin registry files

#[derive(Debug, Deserialize)]
struct RawMarketplaceEntry {
    source: RawMarketplaceSource,
    #[serde(rename = "autoUpdate")]
    auto_update: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "source")]
enum RawMarketplaceSource {
    #[serde(rename = "github")]
    GitHub { repo: String },
    #[serde(rename = "git")]
    Git { url: String },
    #[serde(rename = "local")]
    Local { path: String },
}

#[derive(Debug, Deserialize)]
struct RawInstalledPlugins {
    plugins: HashMap<String, Vec<RawPluginInstall>>,
}

#[derive(Debug, Deserialize)]
struct RawPluginInstall {
    scope: String,
    #[serde(rename = "projectPath")]
    project_path: Option<String>,
    #[serde(rename = "installPath")]
    install_path: String,
    #[serde(default)]
    version: String,
}

impl PluginInventory {
    /// Scan the plugins directory for marketplaces and installed
    /// plugins, resolving each install's enabled state from the scope's
    /// settings file.
    ///
    /// # Errors
    /// Returns an error if a registry file exists but cannot be read or
    /// parsed
    pub fn scan(layout: &ClaudeLayout) -> ScanResult<Self> {
        let marketplaces = Self::scan_marketplaces(layout)?;
        let installed = Self::scan_installed(layout)?;
        Ok(Self {
            marketplaces,
            installed,
        })
    }

    fn scan_marketplaces(layout: &ClaudeLayout) -> ScanResult<Vec<Marketplace>> {
        let known_file = layout.known_marketplaces_file();
        if !known_file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&known_file)?;
        let raw: HashMap<String, RawMarketplaceEntry> =
            serde_json::from_str(&content).map_err(ScanError::JsonParse)?;

        let mut marketplaces: Vec<Marketplace> = raw
            .into_iter()
            .map(|(name, entry)| {
                let (source, location) = match entry.source {
                    RawMarketplaceSource::GitHub { repo } => {
                        let parts: Vec<&str> = repo.split('/').collect();
                        let source = if parts.len() == 2 {
                            MarketplaceSource::GitHub {
                                owner: parts[0].to_string(),
                                repo: parts[1].to_string(),
                            }
                        } else {
                            MarketplaceSource::Url { url: repo.clone() }
                        };
                        (source, repo)
                    }
                    RawMarketplaceSource::Git { url } => {
                        (MarketplaceSource::Url { url: url.clone() }, url)
                    }
                    RawMarketplaceSource::Local { path } => (
                        MarketplaceSource::Local {
                            path: PathBuf::from(&path),
                        },
                        path,
                    ),
                };

                Marketplace {
                    name,
                    source,
                    location,
                    auto_update: entry.auto_update.unwrap_or(false),
                }
            })
            .collect();

        marketplaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(marketplaces)
    }

    fn scan_installed(layout: &ClaudeLayout) -> ScanResult<Vec<InstalledPlugin>> {
        let installed_file = layout.installed_plugins_file();
        if !installed_file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&installed_file)?;
        let raw: RawInstalledPlugins =
            serde_json::from_str(&content).map_err(ScanError::JsonParse)?;

        let mut layer_cache: HashMap<PathBuf, SettingsLayer> = HashMap::new();
        let mut plugins = Vec::new();

        for (plugin_key, installs) in raw.plugins {
            // Plugin key format: "plugin-name@marketplace"
            let parts: Vec<&str> = plugin_key.split('@').collect();
            let plugin_name = parts.first().copied().unwrap_or(plugin_key.as_str());
            let marketplace = parts.get(1).map(|s| (*s).to_string());

            for install in installs {
                let scope = match install.scope.as_str() {
                    "local" => Scope::PluginLocal,
                    _ => Scope::PluginUser,
                };

                let enabled = layout
                    .plugin_enablement_settings(
                        &install.scope,
                        install.project_path.as_deref().map(Path::new),
                    )
                    .map_or(true, |settings_path| {
                        layer_cache
                            .entry(settings_path.clone())
                            .or_insert_with(|| SettingsLayer::read(&settings_path))
                            .plugin_enabled(&plugin_key)
                    });

                plugins.push(InstalledPlugin {
                    key: plugin_key.clone(),
                    name: plugin_name.to_string(),
                    marketplace: marketplace.clone(),
                    scope,
                    enabled,
                    path: PathBuf::from(&install.install_path),
                    version: install.version.clone(),
                    project_path: install.project_path.clone(),
                });
            }
        }

        plugins.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(plugins)
    }

    /// One definition per installed plugin
    #[must_use]
    pub fn plugin_definitions(&self) -> Vec<Definition> {
        self.installed
            .iter()
            .map(|plugin| {
                let mut def = Definition::new(
                    EntityKind::Plugin,
                    plugin.key.clone(),
                    plugin.scope,
                    plugin.path.clone(),
                );
                def.disabled = !plugin.enabled;
                def.exists = plugin.path.exists();
                def.config = Some(serde_json::json!({
                    "version": plugin.version,
                    "marketplace": plugin.marketplace,
                    "projectPath": plugin.project_path,
                }));
                def.plugin = Some(PluginOrigin {
                    plugin: plugin.key.clone(),
                    enabled: plugin.enabled,
                });
                def
            })
            .collect()
    }

    /// Plugin-provided markdown artifacts (commands or agents).
    ///
    /// Artifacts of disabled plugins are still listed; the resolver
    /// reports them as runtime-disabled through the plugin origin.
    #[must_use]
    pub fn artifact_definitions(&self, kind: EntityKind) -> Vec<Definition> {
        let subdir = match kind {
            EntityKind::Command => "commands",
            EntityKind::Agent => "agents",
            _ => return Vec::new(),
        };

        let mut definitions = Vec::new();

        for plugin in &self.installed {
            let dir = plugin.path.join(subdir);
            if !dir.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&dir)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if !path.is_file() || !path.extension().is_some_and(|ext| ext == "md") {
                    continue;
                }

                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                let mut def =
                    Definition::new(kind, name, plugin.scope, path.to_path_buf());
                def.plugin = Some(PluginOrigin {
                    plugin: plugin.key.clone(),
                    enabled: plugin.enabled,
                });
                def.suppressed = !plugin.enabled;
                match fs::read_to_string(path) {
                    Ok(content) => {
                        def.description = extract_description(&content);
                        def.sha256 = Some(sha256_hex(&content));
                        def.content = Some(content);
                    }
                    Err(e) => {
                        def.error = Some(format!("Failed to read {}: {e}", path.display()));
                    }
                }
                definitions.push(def);
            }
        }

        definitions
    }

    /// Plugin-provided skills (one directory per skill)
    #[must_use]
    pub fn skill_definitions(&self) -> Vec<Definition> {
        let mut definitions = Vec::new();

        for plugin in &self.installed {
            let skills_dir = plugin.path.join("skills");
            if !skills_dir.is_dir() {
                continue;
            }

            let mut defs = crate::artifacts::scan_skills_dir(&skills_dir, plugin.scope);
            for def in &mut defs {
                def.plugin = Some(PluginOrigin {
                    plugin: plugin.key.clone(),
                    enabled: plugin.enabled,
                });
                def.suppressed = !plugin.enabled;
            }
            definitions.extend(defs);
        }

        definitions
    }

    /// Plugin-declared MCP servers from each install's `.mcp.json`
    #[must_use]
    pub fn mcp_definitions(&self) -> Vec<Definition> {
        let mut definitions = Vec::new();

        for plugin in &self.installed {
            let mcp_path = plugin.path.join(".mcp.json");
            if !mcp_path.is_file() {
                continue;
            }

            let value: serde_json::Value = match fs::read_to_string(&mcp_path)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str(&c).map_err(|e| e.to_string()))
            {
                Ok(value) => value,
                Err(e) => {
                    let mut def = Definition::new(
                        EntityKind::McpServer,
                        plugin.name.clone(),
                        plugin.scope,
                        mcp_path.clone(),
                    );
                    def.error = Some(format!("Failed to read {}: {e}", mcp_path.display()));
                    def.plugin = Some(PluginOrigin {
                        plugin: plugin.key.clone(),
                        enabled: plugin.enabled,
                    });
                    definitions.push(def);
                    continue;
                }
            };

            for (name, config) in plugin_mcp_servers(&value, &plugin.name) {
                let mut def =
                    Definition::new(EntityKind::McpServer, name, plugin.scope, mcp_path.clone());
                def.config = Some(config);
                def.plugin = Some(PluginOrigin {
                    plugin: plugin.key.clone(),
                    enabled: plugin.enabled,
                });
                def.suppressed = !plugin.enabled;
                definitions.push(def);
            }
        }

        definitions
    }
}
