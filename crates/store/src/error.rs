//! Store error types.

use std::path::PathBuf;

use budgein_core::budget::BudgetError;
use budgein_shared::AppError;
use thiserror::Error;

/// Errors from stores and persistence backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A budget rule rejected the operation.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// An account with this email already exists.
    #[error("An account with email {0} already exists")]
    DuplicateEmail(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A file held something other than the expected JSON.
    #[error("Malformed data in {}: {source}", path.display())]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Any other backend failure.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create an I/O error for a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Budget(e) => e.into(),
            StoreError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            StoreError::Io { .. } | StoreError::Corrupt { .. } | StoreError::Unavailable(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}
