//! File-backed artifact scanning: commands, agents, skills
//!
//! Commands and agents are flat `.md` files; skills are directories
//! holding a `SKILL.md`. The `.disabled` rename marker is recognized on
//! all of them. A directory that does not exist yields no definitions;
//! an unreadable file yields a definition carrying an `error`.

use crate::parser::{extract_description, sha256_hex};
use crate::types::{split_marker, Definition, EntityKind, Scope};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Scan a directory of markdown artifacts (`<name>.md` /
/// `<name>.md.disabled`) into per-scope definitions.
#[must_use]
pub fn scan_markdown_dir(dir: &Path, kind: EntityKind, scope: Scope) -> Vec<Definition> {
    let mut definitions = Vec::new();

    if !dir.exists() {
        return definitions;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return definitions;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some((name, disabled)) = split_marker(file_name, ".md") else {
            continue;
        };

        let mut def = Definition::new(kind, name, scope, path.clone());
        def.disabled = disabled;
        read_artifact_content(&mut def, &path);
        definitions.push(def);
    }

    definitions
}

/// Scan a skills directory (one subdirectory per skill, each holding a
/// `SKILL.md` or `SKILL.md.disabled`).
#[must_use]
pub fn scan_skills_dir(dir: &Path, scope: Scope) -> Vec<Definition> {
    let mut definitions = Vec::new();

    if !dir.exists() {
        return definitions;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return definitions;
    };

    for entry in entries.flatten() {
        let skill_dir = entry.path();
        if !skill_dir.is_dir() {
            continue;
        }

        let Some(name) = skill_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let active = skill_dir.join("SKILL.md");
        let marked = skill_dir.join("SKILL.md.disabled");
        let (path, disabled) = if active.is_file() {
            (active, false)
        } else if marked.is_file() {
            (marked, true)
        } else {
            continue;
        };

        let mut def = Definition::new(EntityKind::Skill, name, scope, path.clone());
        def.disabled = disabled;
        read_artifact_content(&mut def, &path);
        definitions.push(def);
    }

    definitions
}

/// Fill content, description, hash, and mtime for a file-backed
/// definition; a read failure lands on the `error` field.
pub(crate) fn read_artifact_content(def: &mut Definition, path: &Path) {
    def.modified_at = file_modified_at(path);

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
}

/// Last modification time of a file, when the platform reports one
pub(crate) fn file_modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_markdown_dir_with_marker() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("review.md"), "review body").unwrap();
        fs::write(tmp.path().join("deploy.md.disabled"), "deploy body").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let mut defs = scan_markdown_dir(tmp.path(), EntityKind::Command, Scope::User);
        defs.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "deploy");
        assert!(defs[0].disabled);
        assert_eq!(defs[1].name, "review");
        assert!(!defs[1].disabled);
        assert_eq!(defs[1].content.as_deref(), Some("review body"));
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let defs = scan_markdown_dir(
            Path::new("/nonexistent/commands"),
            EntityKind::Command,
            Scope::User,
        );
        assert!(defs.is_empty());
    }

    #[test]
    fn test_scan_skills_dir() {
        let tmp = TempDir::new().unwrap();
        let active = tmp.path().join("search");
        fs::create_dir(&active).unwrap();
        fs::write(
            active.join("SKILL.md"),
            "---\ndescription: Search things\n---\n\nBody",
        )
        .unwrap();

        let off = tmp.path().join("deploy");
        fs::create_dir(&off).unwrap();
        fs::write(off.join("SKILL.md.disabled"), "Body").unwrap();

        let empty = tmp.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let mut defs = scan_skills_dir(tmp.path(), Scope::User);
        defs.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "deploy");
        assert!(defs[0].disabled);
        assert_eq!(defs[1].name, "search");
        assert_eq!(defs[1].description.as_deref(), Some("Search things"));
    }
}
