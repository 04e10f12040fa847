//! Active-profile switch engine
//!
//! Applies a profile's settings over the tool's live configuration with
//! guaranteed reversibility. The rollback artifact is written durably
//! *before* the live file is touched (write-ahead backup), and once
//! captured it is never overwritten while an override is in effect:
//! it always reflects the true original. Transitions are serialized
//! through a mutex because the backup-then-overwrite sequence is not
//! safe under concurrent execution.

use crate::profile::{ProfileError, ProfileStore};
use crate::util::{atomic_write, atomic_write_json, sha256_hex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the switch engine
#[derive(Error, Debug)]
pub enum SwitchError {
    /// Profile lookup or index update failed
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The pre-mutation backup could not be written; the live
    /// configuration was left untouched
    #[error("Failed to write backup before switching: {0}")]
    Backup(String),

    /// The overwrite after a successful backup failed. The backup is
    /// intact; retry the switch or restore the original configuration.
    #[error(
        "Live configuration update failed after backup was captured: {0}. \
         The original configuration is preserved in the backup; retry or restore it."
    )]
    Inconsistent(String),

    /// The backup content does not match its recorded hash
    #[error("Backup integrity check failed: expected {expected}, got {actual}")]
    BackupIntegrity { expected: String, actual: String },

    /// Filesystem failure outside the overwrite step
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Whether the live configuration is original or overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// The user's own configuration is in place
    Original,
    /// A profile's settings are applied
    Overridden(Uuid),
}

/// Sidecar header for the backup artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BackupMeta {
    /// When the backup was captured
    captured_at: DateTime<Utc>,
    /// SHA256 of the backup content
    sha256: String,
    /// Whether the live file existed at capture time
    existed: bool,
    /// Whether an override session is in progress. A restore closes
    /// the session; the next activation then captures a fresh backup
    /// instead of reusing the retained one.
    #[serde(default = "default_true")]
    session_open: bool,
}

fn default_true() -> bool {
    true
}

/// The switch engine for one live-configuration slot
pub struct SwitchEngine {
    store: ProfileStore,
    live_path: PathBuf,
    backup_path: PathBuf,
    meta_path: PathBuf,
    lock: Mutex<()>,
}

impl SwitchEngine {
    /// Create an engine over a profile store and a live settings file.
    ///
    /// The backup artifact lives next to the profile index; its sidecar
    /// header is derived from the backup path.
    #[must_use]
    pub fn new(
        store: ProfileStore,
        live_path: impl Into<PathBuf>,
        backup_path: impl Into<PathBuf>,
    ) -> Self {
        let backup_path = backup_path.into();
        let meta_path = backup_path.with_extension("meta.json");
        Self {
            store,
            live_path: live_path.into(),
            backup_path,
            meta_path,
            lock: Mutex::new(()),
        }
    }

    /// The profile store this engine flips `using` flags in
    #[must_use]
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Current state of the live-configuration slot
    pub fn state(&self) -> Result<SwitchState, SwitchError> {
        match self.store.active()? {
            Some(profile) => Ok(SwitchState::Overridden(profile.id)),
            None => Ok(SwitchState::Original),
        }
    }

    /// Apply a profile's settings to the live configuration.
    ///
    /// From `Original`, the current live content is backed up durably
    /// first; from `Overridden`, the existing backup is kept as-is and
    /// only the live file and `using` flags change.
    pub fn activate(&self, id: Uuid) -> Result<(), SwitchError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let profile = self.store.get(id)?;

        // Capture the backup only at the start of an override session.
        // While a session is open the backup always reflects the true
        // original and is never overwritten; a missing sidecar on an
        // existing backup is treated as an open session so a
        // potentially-overridden live file is never captured.
        let capture = if self.backup_path.exists() {
            self.read_meta().is_some_and(|meta| !meta.session_open)
        } else {
            true
        };
        if capture {
            self.capture_backup()?;
        }

        let content = serde_json::to_string_pretty(&profile.settings)
            .map_err(|e| SwitchError::Inconsistent(e.to_string()))?;
        atomic_write(&self.live_path, content.as_bytes())
            .map_err(|e| SwitchError::Inconsistent(e.to_string()))?;

        self.store
            .set_using(Some(id))
            .map_err(|e| SwitchError::Inconsistent(e.to_string()))?;
        Ok(())
    }

    /// Restore the original live configuration from the backup.
    ///
    /// The backup is retained so repeated restores are idempotent.
    pub fn restore_original(&self) -> Result<(), SwitchError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.restore_locked()
    }

    /// Delete a profile, restoring the original configuration first
    /// when the profile is the active one. A dangling "active but
    /// deleted" state is never observable.
    pub fn delete_profile(&self, id: Uuid) -> Result<(), SwitchError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let profile = self.store.get(id)?;
        if profile.using {
            self.restore_locked()?;
        }
        self.store.delete(id)?;
        Ok(())
    }

    fn restore_locked(&self) -> Result<(), SwitchError> {
        if !self.backup_path.exists() {
            // Nothing was ever overridden; just make sure no profile
            // claims to be in use.
            self.store.set_using(None)?;
            return Ok(());
        }

        let content = fs::read(&self.backup_path).map_err(|e| SwitchError::Io {
            path: self.backup_path.clone(),
            message: e.to_string(),
        })?;

        let meta = self.read_meta();
        if let Some(meta) = &meta {
            let actual = sha256_hex(&content);
            if actual != meta.sha256 {
                return Err(SwitchError::BackupIntegrity {
                    expected: meta.sha256.clone(),
                    actual,
                });
            }
        }

        let existed = meta.as_ref().map_or(true, |m| m.existed);
        if existed {
            atomic_write(&self.live_path, &content).map_err(|e| SwitchError::Io {
                path: self.live_path.clone(),
                message: e.to_string(),
            })?;
        } else if self.live_path.exists() {
            fs::remove_file(&self.live_path).map_err(|e| SwitchError::Io {
                path: self.live_path.clone(),
                message: e.to_string(),
            })?;
        }

        // The backup is retained, but the override session is closed:
        // a later activation starts a new session with a fresh capture.
        let closed = BackupMeta {
            captured_at: meta.as_ref().map_or_else(Utc::now, |m| m.captured_at),
            sha256: sha256_hex(&content),
            existed,
            session_open: false,
        };
        atomic_write_json(&self.meta_path, &closed).map_err(|e| SwitchError::Io {
            path: self.meta_path.clone(),
            message: e.to_string(),
        })?;

        self.store.set_using(None)?;
        Ok(())
    }

    /// Durably persist the current live content before any mutation.
    /// Failure here aborts the activation with the live file untouched.
    fn capture_backup(&self) -> Result<(), SwitchError> {
        let existed = self.live_path.exists();
        let content = if existed {
            fs::read(&self.live_path).map_err(|e| SwitchError::Backup(e.to_string()))?
        } else {
            Vec::new()
        };

        atomic_write(&self.backup_path, &content)
            .map_err(|e| SwitchError::Backup(e.to_string()))?;

        let meta = BackupMeta {
            captured_at: Utc::now(),
            sha256: sha256_hex(&content),
            existed,
            session_open: true,
        };
        atomic_write_json(&self.meta_path, &meta)
            .map_err(|e| SwitchError::Backup(e.to_string()))?;
        Ok(())
    }

    fn read_meta(&self) -> Option<BackupMeta> {
        let content = fs::read_to_string(&self.meta_path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Path of the live configuration file
    #[must_use]
    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Path of the backup artifact
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}
