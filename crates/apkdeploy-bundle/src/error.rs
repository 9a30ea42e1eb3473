//! Error types for bundle operations.

use crate::ValidationError;
use thiserror::Error;

/// Errors that can occur while reading or writing a bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A module or the bundle violates a packaging invariant.
    #[error("Bundle validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Missing required file in bundle.
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// The bundle path is neither a readable archive nor a directory.
    #[error("Invalid bundle: {0}")]
    InvalidBundle(String),
}
