use std::fmt;

use thiserror::Error;

/// Why a key could not be found by a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// The key was never inserted.
    Missing,
    /// The key is present but already marked as deleted.
    Deleted,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Absence::Missing => f.write_str("not present"),
            Absence::Deleted => f.write_str("logically deleted"),
        }
    }
}

/// Errors that can occur when working with a chained hash map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Delete on a key that is absent or already deleted
    #[error("key {key:?} not found in table: {absence}")]
    KeyNotFound { key: String, absence: Absence },

    /// Another resize already holds the migration state
    #[error("a resize is already in progress")]
    ResizeInProgress,

    /// The bucket array cannot grow any further
    #[error("failed to resize a table at max capacity ({capacity})")]
    AtMaxCapacity { capacity: u64 },

    /// The secure random source could not produce hash keys
    #[error("failed to generate hash keys: {0}")]
    KeyGeneration(String),

    /// Rejected table configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TableError {
    pub(crate) fn key_not_found(key: &[u8], absence: Absence) -> Self {
        TableError::KeyNotFound {
            key: String::from_utf8_lossy(key).into_owned(),
            absence,
        }
    }

    /// Whether the same call may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TableError::ResizeInProgress)
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
