//! Toggle protocol tests, including concurrent access

use std::fs;
use std::sync::Arc;
use stratum_core::toggle::{ToggleError, ToggleOps};
use stratum_scanner::types::{disabled_variant, Definition, EntityKind, PluginOrigin, Scope};
use tempfile::TempDir;

#[test]
fn test_double_toggle_restores_identical_content() {
    let tmp = TempDir::new().unwrap();
    let active = tmp.path().join("review.md");
    let body = "---\ndescription: Review\n---\n\nReview the diff.\n";
    fs::write(&active, body).unwrap();
    let ops = ToggleOps::new();

    ops.set_disabled(&active, true).unwrap();
    ops.set_disabled(&active, false).unwrap();

    assert!(active.exists());
    assert!(!disabled_variant(&active).exists());
    assert_eq!(fs::read_to_string(&active).unwrap(), body);
}

#[test]
fn test_plugin_definition_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plugin-cmd.md");
    fs::write(&path, "body").unwrap();

    let mut def = Definition::new(EntityKind::Command, "plugin-cmd", Scope::PluginUser, path);
    def.plugin = Some(PluginOrigin {
        plugin: "kit@official".to_string(),
        enabled: true,
    });

    let ops = ToggleOps::new();
    assert!(matches!(
        ops.set_definition_disabled(&def, true),
        Err(ToggleError::NotControllable(_))
    ));
}

#[test]
fn test_definition_toggle_from_disabled_path() {
    let tmp = TempDir::new().unwrap();
    let active = tmp.path().join("deploy.md");
    let marked = disabled_variant(&active);
    fs::write(&marked, "body").unwrap();

    // The scanner reports the definition at its disabled path; enabling
    // through the definition renames it back.
    let mut def = Definition::new(EntityKind::Command, "deploy", Scope::User, marked.clone());
    def.disabled = true;

    let ops = ToggleOps::new();
    ops.set_definition_disabled(&def, false).unwrap();
    assert!(active.exists());
    assert!(!marked.exists());
}

#[test]
fn test_concurrent_toggles_on_different_entities() {
    let tmp = TempDir::new().unwrap();
    let ops = Arc::new(ToggleOps::new());

    let mut paths = Vec::new();
    for i in 0..8 {
        let path = tmp.path().join(format!("cmd-{i}.md"));
        fs::write(&path, format!("body {i}")).unwrap();
        paths.push(path);
    }

    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| {
            let ops = Arc::clone(&ops);
            std::thread::spawn(move || ops.set_disabled(&path, true))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // Every artifact was renamed, and none lost its content.
    for (i, path) in paths.iter().enumerate() {
        let marked = disabled_variant(path);
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&marked).unwrap(), format!("body {i}"));
    }
}

#[test]
fn test_concurrent_toggles_on_same_entity_serialize() {
    let tmp = TempDir::new().unwrap();
    let ops = Arc::new(ToggleOps::new());
    let active = tmp.path().join("review.md");
    fs::write(&active, "body").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ops = Arc::clone(&ops);
            let active = active.clone();
            std::thread::spawn(move || ops.set_disabled(&active, i % 2 == 0))
        })
        .collect();

    for handle in handles {
        // Each call either performed the rename or was an idempotent
        // no-op; none may fail.
        handle.join().unwrap().unwrap();
    }

    // Exactly one variant survives with the original content.
    let marked = disabled_variant(&active);
    assert!(active.exists() ^ marked.exists());
    let survivor = if active.exists() { &active } else { &marked };
    assert_eq!(fs::read_to_string(survivor).unwrap(), "body");
}
