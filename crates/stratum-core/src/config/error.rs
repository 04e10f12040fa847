//! Error types for config mutations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during config mutations.
///
/// A failed mutation leaves prior state intact; nothing here is
/// downgraded to a silent no-op success.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Entity not found
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    /// Target already exists; refusing to overwrite
    #[error("{kind} '{name}' already exists")]
    Conflict { kind: String, name: String },

    /// Definition is plugin-owned and cannot be mutated independently
    #[error("{kind} '{name}' is plugin-owned and not controllable")]
    NotControllable { kind: String, name: String },

    /// Structured content cannot be parsed
    #[error("Malformed content in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Filesystem failure
    #[error("IO error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Invalid input (bad name, missing project path, unsupported kind)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<crate::util::UtilError> for ConfigError {
    fn from(err: crate::util::UtilError) -> Self {
        match err {
            crate::util::UtilError::Io { path, message } => Self::Io {
                path: PathBuf::from(path),
                message,
            },
            crate::util::UtilError::InvalidName(message) => Self::Validation(message),
        }
    }
}

impl From<crate::toggle::ToggleError> for ConfigError {
    fn from(err: crate::toggle::ToggleError) -> Self {
        use crate::toggle::ToggleError;
        match err {
            ToggleError::NotFound(path) => Self::NotFound {
                kind: "artifact".to_string(),
                name: path.display().to_string(),
            },
            ToggleError::Conflict { active, .. } => Self::Conflict {
                kind: "artifact".to_string(),
                name: active.display().to_string(),
            },
            ToggleError::NotControllable(name) => Self::NotControllable {
                kind: "artifact".to_string(),
                name,
            },
            ToggleError::Io { path, message } => Self::Io { path, message },
        }
    }
}
