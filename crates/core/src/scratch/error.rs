//! Error types for the scratch module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with scratch files.
#[derive(Debug, Error)]
pub enum ScratchError {
    /// The scratch directory could not be created.
    #[error("Failed to create scratch directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File does not exist.
    #[error("Scratch file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to rename a file.
    #[error("Failed to rename {source_path} to {destination}")]
    RenameFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// File name is not usable inside the scratch space.
    #[error("Invalid scratch file name: {name}")]
    InvalidName { name: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScratchError {
    /// Creates a rename failed error.
    pub fn rename_failed(
        source_path: PathBuf,
        destination: PathBuf,
        error: std::io::Error,
    ) -> Self {
        Self::RenameFailed {
            source_path,
            destination,
            error,
        }
    }
}
