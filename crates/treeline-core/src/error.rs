//! Error types for Treeline.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Treeline error types.
#[derive(Debug, Error)]
pub enum Error {
    /// The source repository could not be opened or read
    #[error("Source repository error: {0}")]
    Source(String),

    /// A blob's content could not be read while building a snapshot
    #[error("Failed to read content of {path}: {reason}")]
    ContentRead { path: String, reason: String },

    /// A parent was not reconstructed before its child
    #[error("Parent {parent} of commit {child} has not been reconstructed")]
    MissingParent { child: String, parent: String },

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
