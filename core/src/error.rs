//! Error types for metadata extraction and row materialization.

use thiserror::Error;

/// A descriptor cannot produce the requested statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The type has no table binding.
    #[error("{entity} has no table binding")]
    MissingTable {
        /// Mapped type name.
        entity: String,
    },

    /// No field carries a key binding.
    #[error("{entity} has no key binding")]
    MissingKey {
        /// Mapped type name.
        entity: String,
    },

    /// The first key field has no column binding, so it cannot be selected by.
    #[error("key field '{field}' of {entity} has no column binding")]
    KeyWithoutColumn {
        /// Mapped type name.
        entity: String,
        /// Field name of the first key field.
        field: String,
    },

    /// The instance could not provide a value for a bound field.
    #[error("field '{field}' of {entity} could not be read")]
    UnreadableField {
        /// Mapped type name.
        entity: String,
        /// Field that yielded no value.
        field: String,
    },

    /// Deleting by instance needs at least one column to match on.
    #[error("{entity} has no column bindings")]
    NoColumns {
        /// Mapped type name.
        entity: String,
    },
}

/// A result row cannot be turned into an instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The conversion expects a different number of values than the row holds.
    #[error("row has {found} values but the conversion takes {expected}")]
    ArityMismatch {
        /// Arity of the conversion.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// Positional access past the end of the row.
    #[error("column index {index} out of range for row of {len} values")]
    ColumnOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of values in the row.
        len: usize,
    },

    /// Access by a column name the row does not carry.
    #[error("row has no column '{0}'")]
    UnknownColumn(String),

    /// The stored value cannot be converted to the requested Rust type.
    #[error("column '{column}' holds {found}, expected {expected}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Requested type.
        expected: &'static str,
        /// Kind of the stored value.
        found: &'static str,
    },
}
