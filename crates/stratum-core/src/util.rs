//! Utility functions for stratum-core

use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors from filesystem utilities
#[derive(Error, Debug)]
pub enum UtilError {
    #[error("IO error for {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Write a file atomically: write to a temp file in the same directory,
/// flush it to disk, then rename over the target.
///
/// The durability step matters for the switch engine's backup: the
/// rollback artifact must be on disk before the guarded file is touched.
///
/// # Errors
/// Returns an error if the temp file cannot be created, written,
/// synced, or renamed
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), UtilError> {
    let io_err = |e: &dyn std::fmt::Display| UtilError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let dir = path.parent().ok_or_else(|| UtilError::Io {
        path: path.display().to_string(),
        message: "no parent directory".to_string(),
    })?;
    fs::create_dir_all(dir).map_err(|e| io_err(&e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_err(&e))?;
    tmp.write_all(content).map_err(|e| io_err(&e))?;
    tmp.as_file().sync_all().map_err(|e| io_err(&e))?;
    tmp.persist(path).map_err(|e| io_err(&e))?;
    Ok(())
}

/// Serialize a value to pretty JSON and write it atomically
///
/// # Errors
/// Returns an error if serialization or the write fails
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), UtilError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| UtilError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    atomic_write(path, content.as_bytes())
}

/// Validate an entity name for use in paths.
///
/// Names must not contain path separators, `..` sequences, or null
/// bytes, and must not be empty.
///
/// # Errors
/// Returns an error if the name is invalid
pub fn validate_name(name: &str) -> Result<(), UtilError> {
    if name.is_empty() {
        return Err(UtilError::InvalidName("name cannot be empty".to_string()));
    }

    if name.len() > 128 {
        return Err(UtilError::InvalidName(
            "name cannot exceed 128 characters".to_string(),
        ));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(UtilError::InvalidName(format!(
            "name contains path separator: {name}"
        )));
    }

    if name.contains("..") {
        return Err(UtilError::InvalidName(format!(
            "name contains parent directory reference: {name}"
        )));
    }

    if name.contains('\0') {
        return Err(UtilError::InvalidName(
            "name contains null byte".to_string(),
        ));
    }

    Ok(())
}

/// SHA256 of raw content, hex encoded
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
