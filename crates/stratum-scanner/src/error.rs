//! Error types for the stratum scanner

use thiserror::Error;

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur during scanning
///
/// Per-item problems (unreadable files, malformed JSON inside an
/// existing definition) are captured on the definition itself and do
/// not surface here; these variants cover failures of a scan as a whole.
#[derive(Error, Debug)]
pub enum ScanError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Home directory not found
    #[error("Home directory not found")]
    HomeNotFound,

    /// Scan was cancelled by a superseding request
    #[error("Scan cancelled")]
    Cancelled,
}
