//! Profile store CRUD tests

use serde_json::json;
use stratum_core::profile::{ProfileError, ProfileStore};
use tempfile::TempDir;

fn store_fixture(tmp: &TempDir) -> ProfileStore {
    ProfileStore::new(tmp.path().join("profiles.json"))
}

#[test]
fn test_create_and_get() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    let profile = store
        .create("Work", json!({"env": {"API_BASE": "https://corp.example"}}))
        .unwrap();

    let retrieved = store.get(profile.id).unwrap();
    assert_eq!(retrieved.title, "Work");
    assert_eq!(retrieved.settings, profile.settings);
    assert!(!retrieved.using);
}

#[test]
fn test_list_is_sorted_by_creation() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    store.create("first", json!({})).unwrap();
    store.create("second", json!({})).unwrap();
    store.create("third", json!({})).unwrap();

    let profiles = store.list().unwrap();
    assert_eq!(profiles.len(), 3);
    assert!(profiles[0].created_at <= profiles[1].created_at);
    assert!(profiles[1].created_at <= profiles[2].created_at);
}

#[test]
fn test_get_unknown_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    assert!(matches!(
        store.get(uuid::Uuid::new_v4()),
        Err(ProfileError::NotFound(_))
    ));
}

#[test]
fn test_update() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    let profile = store.create("Work", json!({"a": 1})).unwrap();
    let updated = store
        .update(profile.id, "Personal", json!({"a": 2}))
        .unwrap();

    assert_eq!(updated.title, "Personal");
    assert_eq!(store.get(profile.id).unwrap().settings, json!({"a": 2}));
}

#[test]
fn test_update_unknown_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    assert!(matches!(
        store.update(uuid::Uuid::new_v4(), "x", json!({})),
        Err(ProfileError::NotFound(_))
    ));
}

#[test]
fn test_delete() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    let profile = store.create("Work", json!({})).unwrap();
    store.delete(profile.id).unwrap();
    assert!(store.list().unwrap().is_empty());

    assert!(matches!(
        store.delete(profile.id),
        Err(ProfileError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_id_is_conflict() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    let profile = store.create("Work", json!({})).unwrap();
    assert!(matches!(
        store.insert(profile.clone()),
        Err(ProfileError::Conflict(_))
    ));
}

#[test]
fn test_duplicate_copies_settings_under_new_id() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);

    let original = store.create("Work", json!({"env": {"K": "v"}})).unwrap();
    let copy = store.duplicate(original.id).unwrap();

    assert_ne!(copy.id, original.id);
    assert_eq!(copy.title, "Work (copy)");
    assert_eq!(copy.settings, original.settings);
    assert!(!copy.using);
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn test_malformed_index_is_reported() {
    let tmp = TempDir::new().unwrap();
    let store = store_fixture(&tmp);
    std::fs::write(store.index_path(), "{broken").unwrap();

    assert!(matches!(store.list(), Err(ProfileError::Malformed { .. })));
}

#[test]
fn test_index_survives_reload() {
    let tmp = TempDir::new().unwrap();
    let profile = {
        let store = store_fixture(&tmp);
        store.create("Work", json!({"k": true})).unwrap()
    };

    let reopened = store_fixture(&tmp);
    let retrieved = reopened.get(profile.id).unwrap();
    assert_eq!(retrieved.title, "Work");
    assert_eq!(retrieved.created_at, profile.created_at);
}
