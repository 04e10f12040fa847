//! Profile index persistence
//!
//! All profiles live in one JSON index file written atomically. The
//! store does plain CRUD; the `using` flag is owned by the switch
//! engine, which goes through [`ProfileStore::set_using`].

use super::Profile;
use crate::util::atomic_write_json;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors from profile storage
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No profile with the given id
    #[error("Profile {0} not found")]
    NotFound(Uuid),

    /// A profile with the given id already exists
    #[error("Profile {0} already exists")]
    Conflict(Uuid),

    /// The index file exists but cannot be parsed
    #[error("Malformed profile index {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Filesystem failure
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// On-disk shape of the index file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfileIndex {
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// CRUD over the profiles index file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    index_path: PathBuf,
}

impl ProfileStore {
    /// Store backed by an explicit index file
    #[must_use]
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    /// The index file backing this store
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// List profiles, oldest first
    pub fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        let mut profiles = self.load()?.profiles;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(profiles)
    }

    /// Get one profile by id
    pub fn get(&self, id: Uuid) -> Result<Profile, ProfileError> {
        self.load()?
            .profiles
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))
    }

    /// The currently active profile, if any
    pub fn active(&self) -> Result<Option<Profile>, ProfileError> {
        Ok(self.load()?.profiles.into_iter().find(|p| p.using))
    }

    /// Create a new profile
    pub fn create(
        &self,
        title: impl Into<String>,
        settings: serde_json::Value,
    ) -> Result<Profile, ProfileError> {
        let profile = Profile::new(title, settings);
        self.insert(profile.clone())?;
        Ok(profile)
    }

    /// Insert a fully-formed profile; fails on a duplicate id
    pub fn insert(&self, profile: Profile) -> Result<(), ProfileError> {
        let mut index = self.load()?;
        if index.profiles.iter().any(|p| p.id == profile.id) {
            return Err(ProfileError::Conflict(profile.id));
        }
        index.profiles.push(profile);
        self.save(&index)
    }

    /// Copy an existing profile under a fresh id and "(copy)" title
    pub fn duplicate(&self, id: Uuid) -> Result<Profile, ProfileError> {
        let source = self.get(id)?;
        let copy = Profile::new(format!("{} (copy)", source.title), source.settings);
        self.insert(copy.clone())?;
        Ok(copy)
    }

    /// Update a profile's title and settings
    pub fn update(
        &self,
        id: Uuid,
        title: impl Into<String>,
        settings: serde_json::Value,
    ) -> Result<Profile, ProfileError> {
        let mut index = self.load()?;
        let profile = index
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))?;

        profile.title = title.into();
        profile.settings = settings;
        let updated = profile.clone();
        self.save(&index)?;
        Ok(updated)
    }

    /// Delete a profile.
    ///
    /// This is the raw removal; deleting the active profile must go
    /// through the switch engine so the original configuration is
    /// restored first.
    pub fn delete(&self, id: Uuid) -> Result<(), ProfileError> {
        let mut index = self.load()?;
        let before = index.profiles.len();
        index.profiles.retain(|p| p.id != id);
        if index.profiles.len() == before {
            return Err(ProfileError::NotFound(id));
        }
        self.save(&index)
    }

    /// Mark one profile as in use (clearing every other), or clear all.
    ///
    /// Only the switch engine calls this; a `using` flag that does not
    /// reflect the live configuration is an invariant violation.
    pub(crate) fn set_using(&self, id: Option<Uuid>) -> Result<(), ProfileError> {
        let mut index = self.load()?;

        if let Some(id) = id {
            if !index.profiles.iter().any(|p| p.id == id) {
                return Err(ProfileError::NotFound(id));
            }
        }

        for profile in &mut index.profiles {
            profile.using = Some(profile.id) == id;
        }
        self.save(&index)
    }

    fn load(&self) -> Result<ProfileIndex, ProfileError> {
        if !self.index_path.exists() {
            return Ok(ProfileIndex::default());
        }

        let content = fs::read_to_string(&self.index_path).map_err(|e| ProfileError::Io {
            path: self.index_path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ProfileError::Malformed {
            path: self.index_path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, index: &ProfileIndex) -> Result<(), ProfileError> {
        atomic_write_json(&self.index_path, index).map_err(|e| ProfileError::Io {
            path: self.index_path.clone(),
            message: e.to_string(),
        })
    }
}
