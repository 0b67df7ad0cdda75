//! Error Handling Module
//!
//! Defines custom error types for the CelebA-Spoof dataset library.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for CelebA-Spoof dataset operations
#[derive(Error, Debug)]
pub enum SpoofError {
    /// Manifest or archive file absent
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed manifest row
    #[error("Malformed manifest row at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Index outside the valid sample range
    #[error("Index {index} out of range for dataset of size {len}")]
    OutOfRange { index: usize, len: usize },

    /// Error decoding an image file
    #[error("Failed to decode image at '{}': {}", .0.display(), .1)]
    Decode(PathBuf, String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Archive download failed
    #[error("Download error: {0}")]
    Download(String),

    /// Archive extraction failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SpoofError {
    fn from(err: serde_json::Error) -> Self {
        SpoofError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SpoofError {
    fn from(err: reqwest::Error) -> Self {
        SpoofError::Download(err.to_string())
    }
}

/// Convenience Result type for CelebA-Spoof dataset operations
pub type Result<T> = std::result::Result<T, SpoofError>;
