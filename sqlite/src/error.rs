//! Error types for SQLite-backed table mapping.
//!
//! Separates descriptor problems, row conversion failures and database
//! failures so callers can tell them apart. "No matching row" is never an
//! error; operations report it as `false`, `None` or an empty list.

use tablemap_core::{MappingError, RowError};
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite reported a failure (bad SQL, constraint violation, I/O).
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// The type's descriptor cannot produce the statement.
    #[error("mapping error: {0}")]
    MappingError(#[from] MappingError),

    /// A result row could not be converted into an instance.
    #[error("row conversion error: {0}")]
    RowError(#[from] RowError),

    /// A scheme name that cannot be attached.
    #[error("invalid scheme '{0}': must contain only alphanumeric characters and underscores")]
    InvalidScheme(String),

    /// Configuration file could not be read or written.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file is not valid YAML for [`ConnectionConfig`](crate::ConnectionConfig).
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
