//! Descriptor validation.
//!
//! Catches descriptors that would produce broken or surprising SQL before
//! they reach a database: missing bindings, identifiers that cannot be
//! spliced into statement text, duplicate names, and key layouts the by-id
//! operations handle only partially.
//!
//! Validation is advisory. The statement builders accept any descriptor
//! that has the bindings they need; this module reports everything else.
//!
//! # Examples
//!
//! ```
//! use tablemap_core::*;
//!
//! let good = TableDescriptor::new("Item")
//!     .with_table("main", "items")
//!     .keyed_column("id", "id", "id")
//!     .column("label", "label");
//! assert!(validate_descriptor(&good).is_empty());
//!
//! let bad = TableDescriptor::new("Item")
//!     .with_table("main", "items")
//!     .column("label", "label;--");
//! assert!(!validate_descriptor(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::descriptor::{BindingKind, TableDescriptor};

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The descriptor has no table binding.
    #[error("missing table binding")]
    MissingTable,
    /// A scheme, table, column or key name is not a plain identifier.
    #[error("invalid identifier '{0}': must be alphanumeric or underscore and not start with a digit")]
    InvalidIdentifier(String),
    /// A field has neither a column nor a key binding.
    #[error("field '{0}' has no column or key binding")]
    UnboundField(String),
    /// Two fields share the same field name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),
    /// Two fields are bound to the same column.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    /// Two fields are bound to the same key name.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    /// More than one key field; by-id operations only use the first.
    #[error("multiple key fields ({0}); only the first is used by id operations")]
    MultipleKeys(String),
    /// The first key field has no column binding, so select-by-id cannot work.
    #[error("key field '{0}' has no column binding; select by id is unavailable")]
    KeyWithoutColumn(String),
}

/// Returns true if `name` is a plain SQL identifier.
///
/// # Examples
///
/// ```
/// use tablemap_core::is_identifier;
///
/// assert!(is_identifier("user_accounts"));
/// assert!(!is_identifier("9lives"));
/// assert!(!is_identifier("drop table"));
/// ```
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Validates a table descriptor and returns every problem found.
pub fn validate_descriptor(descriptor: &TableDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match &descriptor.table {
        None => errors.push(ValidationError::MissingTable),
        Some(table) => {
            for name in [&table.scheme, &table.name] {
                if !is_identifier(name) {
                    errors.push(ValidationError::InvalidIdentifier(name.clone()));
                }
            }
        }
    }

    let mut fields = HashSet::new();
    let mut columns = HashSet::new();
    let mut keys = HashSet::new();

    for binding in &descriptor.fields {
        if !fields.insert(binding.field.as_str()) {
            errors.push(ValidationError::DuplicateField(binding.field.clone()));
        }
        if binding.column.is_none() && binding.key.is_none() {
            errors.push(ValidationError::UnboundField(binding.field.clone()));
        }
        if let Some(column) = &binding.column {
            if !is_identifier(column) {
                errors.push(ValidationError::InvalidIdentifier(column.clone()));
            } else if !columns.insert(column.as_str()) {
                errors.push(ValidationError::DuplicateColumn(column.clone()));
            }
        }
        if let Some(key) = &binding.key {
            if !is_identifier(key) {
                errors.push(ValidationError::InvalidIdentifier(key.clone()));
            } else if !keys.insert(key.as_str()) {
                errors.push(ValidationError::DuplicateKey(key.clone()));
            }
        }
    }

    let key_fields: Vec<_> = descriptor.bound_fields(BindingKind::Key).collect();
    if key_fields.len() > 1 {
        let names = key_fields
            .iter()
            .map(|f| f.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(ValidationError::MultipleKeys(names));
    }
    if let Some(first) = key_fields.first() {
        if first.column.is_none() {
            errors.push(ValidationError::KeyWithoutColumn(first.field.clone()));
        }
    }

    errors
}
