//! Metadata extraction from table descriptors.
//!
//! Every list produced here follows field declaration order, so a name list
//! and a value list extracted for the same [`BindingKind`] always pair up
//! position by position.

use crate::descriptor::{BindingKind, FieldBinding, TableBinding, TableDescriptor};
use crate::entity::FieldSource;
use crate::error::MappingError;
use crate::value::Value;

/// Returns the table binding.
///
/// # Errors
///
/// Returns [`MappingError::MissingTable`] if the descriptor has none.
pub fn table_info(descriptor: &TableDescriptor) -> Result<&TableBinding, MappingError> {
    descriptor
        .table
        .as_ref()
        .ok_or_else(|| MappingError::MissingTable {
            entity: descriptor.entity.clone(),
        })
}

/// Column names of every column-bound field.
pub fn column_names(descriptor: &TableDescriptor) -> Vec<&str> {
    names(descriptor, BindingKind::Column)
}

/// Key names of every key-bound field.
pub fn key_names(descriptor: &TableDescriptor) -> Vec<&str> {
    names(descriptor, BindingKind::Key)
}

fn names(descriptor: &TableDescriptor, kind: BindingKind) -> Vec<&str> {
    descriptor
        .fields
        .iter()
        .filter_map(|f| f.name_for(kind))
        .collect()
}

/// Returns the first key-bound field. Only this field is used by the by-id
/// operations, whatever other key fields exist.
///
/// # Errors
///
/// Returns [`MappingError::MissingKey`] if no field carries a key binding.
pub fn first_key_field(descriptor: &TableDescriptor) -> Result<&FieldBinding, MappingError> {
    descriptor
        .bound_fields(BindingKind::Key)
        .next()
        .ok_or_else(|| MappingError::MissingKey {
            entity: descriptor.entity.clone(),
        })
}

/// Reads the value of every field bound with `kind` and renders it as a SQL
/// literal.
///
/// # Errors
///
/// Returns [`MappingError::UnreadableField`] if the source yields no value
/// for a bound field.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use tablemap_core::{BindingKind, TableDescriptor, Value, metadata};
///
/// let d = TableDescriptor::new("User")
///     .with_table("public", "users")
///     .key("id", "id")
///     .column("name", "name");
///
/// let mut user = BTreeMap::new();
/// user.insert("id".to_string(), Value::from(42));
/// user.insert("name".to_string(), Value::from("hello"));
///
/// assert_eq!(metadata::literal_values(&d, &user, BindingKind::Key).unwrap(), vec!["42"]);
/// assert_eq!(metadata::literal_values(&d, &user, BindingKind::Column).unwrap(), vec!["'hello'"]);
/// ```
pub fn literal_values(
    descriptor: &TableDescriptor,
    source: &dyn FieldSource,
    kind: BindingKind,
) -> Result<Vec<String>, MappingError> {
    Ok(field_values(descriptor, source, kind)?
        .iter()
        .map(Value::to_sql_literal)
        .collect())
}

/// Reads the value of every field bound with `kind`, in declaration order.
///
/// # Errors
///
/// Returns [`MappingError::UnreadableField`] if the source yields no value
/// for a bound field.
pub fn field_values(
    descriptor: &TableDescriptor,
    source: &dyn FieldSource,
    kind: BindingKind,
) -> Result<Vec<Value>, MappingError> {
    descriptor
        .bound_fields(kind)
        .map(|f| {
            source
                .field_value(&f.field)
                .ok_or_else(|| MappingError::UnreadableField {
                    entity: descriptor.entity.clone(),
                    field: f.field.clone(),
                })
        })
        .collect()
}
