//! Rename-based toggle protocol
//!
//! Disabling an artifact appends the `.disabled` suffix to its file
//! name; enabling reverses the rename. The marker survives inspection
//! by the external CLI, which only understands filename conventions.
//! Toggles are idempotent, atomic at the filesystem level (a single
//! rename), and refuse to overwrite an existing target.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stratum_scanner::types::{disabled_variant, enabled_variant, Definition};
use thiserror::Error;

/// Errors from toggle operations
#[derive(Error, Debug)]
pub enum ToggleError {
    /// The artifact to rename does not exist
    #[error("Artifact {0} does not exist")]
    NotFound(PathBuf),

    /// Both the active and disabled variants exist; renaming would
    /// silently overwrite one of them
    #[error("Both {active} and {disabled} exist; refusing to overwrite")]
    Conflict { active: PathBuf, disabled: PathBuf },

    /// The definition's scope does not permit rename operations
    #[error("{0} is owned by a plugin and cannot be toggled independently")]
    NotControllable(String),

    /// Filesystem failure during the rename
    #[error("Failed to rename {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Toggle operations with per-entity serialization.
///
/// Toggles on distinct artifacts run concurrently; two toggles on the
/// same artifact are serialized through a per-path lock so renames
/// never race.
#[derive(Debug, Default)]
pub struct ToggleOps {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ToggleOps {
    /// Create a toggle manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disabled state of an artifact identified by its active
    /// (unmarked) path.
    ///
    /// # Errors
    /// Returns `NotFound` if no variant of the artifact exists,
    /// `Conflict` if both variants exist, or `Io` on rename failure
    pub fn set_disabled(&self, active: &Path, disabled: bool) -> Result<(), ToggleError> {
        let lock = self.lock_for(active);
        let _guard = lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let marked = disabled_variant(active);
        let active_exists = active.exists();
        let marked_exists = marked.exists();

        if active_exists && marked_exists {
            return Err(ToggleError::Conflict {
                active: active.to_path_buf(),
                disabled: marked,
            });
        }

        let (from, to, already_done) = if disabled {
            (active, marked.as_path(), marked_exists)
        } else {
            (marked.as_path(), active, active_exists)
        };

        // Toggling to the current state is a no-op, not an error.
        if already_done {
            return Ok(());
        }

        if !from.exists() {
            return Err(ToggleError::NotFound(from.to_path_buf()));
        }

        std::fs::rename(from, to).map_err(|e| ToggleError::Io {
            path: from.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Toggle a scanned definition, re-validating controllability.
    ///
    /// The caller is expected to have checked `controllable` already;
    /// plugin-scope definitions are rejected here regardless.
    ///
    /// # Errors
    /// Returns `NotControllable` for plugin-scope definitions, plus the
    /// errors of [`Self::set_disabled`]
    pub fn set_definition_disabled(
        &self,
        definition: &Definition,
        disabled: bool,
    ) -> Result<(), ToggleError> {
        if definition.scope.is_plugin() {
            return Err(ToggleError::NotControllable(definition.name.clone()));
        }

        let active = enabled_variant(&definition.path)
            .unwrap_or_else(|| definition.path.clone());
        self.set_disabled(&active, disabled)
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_disable_then_enable_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let active = tmp.path().join("review.md");
        fs::write(&active, "body").unwrap();
        let ops = ToggleOps::new();

        ops.set_disabled(&active, true).unwrap();
        assert!(!active.exists());
        assert!(disabled_variant(&active).exists());

        ops.set_disabled(&active, false).unwrap();
        assert!(active.exists());
        assert_eq!(fs::read_to_string(&active).unwrap(), "body");
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let active = tmp.path().join("review.md");
        fs::write(&active, "body").unwrap();
        let ops = ToggleOps::new();

        ops.set_disabled(&active, false).unwrap();
        assert!(active.exists());

        ops.set_disabled(&active, true).unwrap();
        ops.set_disabled(&active, true).unwrap();
        assert!(disabled_variant(&active).exists());
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let active = tmp.path().join("ghost.md");
        let ops = ToggleOps::new();
        assert!(matches!(
            ops.set_disabled(&active, true),
            Err(ToggleError::NotFound(_))
        ));
    }

    #[test]
    fn test_both_variants_is_conflict() {
        let tmp = TempDir::new().unwrap();
        let active = tmp.path().join("review.md");
        fs::write(&active, "a").unwrap();
        fs::write(disabled_variant(&active), "b").unwrap();
        let ops = ToggleOps::new();

        assert!(matches!(
            ops.set_disabled(&active, true),
            Err(ToggleError::Conflict { .. })
        ));
        // Neither file was touched.
        assert_eq!(fs::read_to_string(&active).unwrap(), "a");
    }
}
