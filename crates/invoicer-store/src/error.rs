//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  std::io::Error / serde_json::Error                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds the file path                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (CLI) ← code + message                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Load paths recover from bad files on their own; only saves and explicit
//! lookups surface these errors.

use std::path::{Path, PathBuf};

use invoicer_core::{CoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its file.
    ///
    /// ## When This Occurs
    /// - Unknown profile id
    /// - Deleting a history record that is not there
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Reading or writing a file failed.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Disk full
    /// - Logo source file missing
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a file's contents failed.
    #[error("JSON error on {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Edit rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain rule rejected the operation (e.g. wrong license key).
    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
