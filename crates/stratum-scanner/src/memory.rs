//! Memory file scanning (CLAUDE.md)
//!
//! One global memory file under `~/.claude/`, plus one per known
//! project at the project root. The global entry is always listed even
//! when the file does not exist yet; project entries are listed only
//! when a file (active or disabled) is present.

use crate::artifacts::read_artifact_content;
use crate::layout::ClaudeLayout;
use crate::types::{disabled_variant, Definition, EntityKind, Scope};
use std::path::Path;

/// Scan the global memory file
#[must_use]
pub fn scan_user_memory(layout: &ClaudeLayout) -> Vec<Definition> {
    let active = layout.user_memory();
    vec![memory_definition("global", &active, Scope::User, true)]
}

/// Scan one project's memory file
#[must_use]
pub fn scan_project_memory(project: &Path) -> Vec<Definition> {
    let active = ClaudeLayout::project_memory(project);
    let name = project
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");

    let def = memory_definition(name, &active, Scope::Project, false);
    if def.exists {
        vec![def]
    } else {
        Vec::new()
    }
}

fn memory_definition(
    name: &str,
    active: &Path,
    scope: Scope,
    always_listed: bool,
) -> Definition {
    let marked = disabled_variant(active);

    let (path, exists, disabled) = if active.is_file() {
        (active.to_path_buf(), true, false)
    } else if marked.is_file() {
        (marked, true, true)
    } else {
        (active.to_path_buf(), false, false)
    };

    let mut def = Definition::new(EntityKind::Memory, name, scope, path.clone());
    def.exists = exists;
    def.disabled = disabled;
    if exists {
        read_artifact_content(&mut def, &path);
    } else if always_listed {
        def.content = Some(String::new());
    }
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_global_memory_listed_when_absent() {
        let tmp = TempDir::new().unwrap();
        let layout = ClaudeLayout::from_home(tmp.path());

        let defs = scan_user_memory(&layout);
        assert_eq!(defs.len(), 1);
        assert!(!defs[0].exists);
        assert!(!defs[0].disabled);
    }

    #[test]
    fn test_disabled_project_memory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("CLAUDE.md.disabled"), "rules").unwrap();

        let defs = scan_project_memory(tmp.path());
        assert_eq!(defs.len(), 1);
        assert!(defs[0].exists);
        assert!(defs[0].disabled);
        assert_eq!(defs[0].content.as_deref(), Some("rules"));
    }

    #[test]
    fn test_absent_project_memory_not_listed() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_project_memory(tmp.path()).is_empty());
    }
}
