//! Traits a type implements to be mapped to a table.
//!
//! [`FieldSource`] is the read side (an instance hands out its field values
//! by field name); [`Entity`] adds the static descriptor and the row
//! conversion. Implementations are written by hand:
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use tablemap_core::{Entity, FieldSource, Row, RowError, TableDescriptor, Value, row};
//!
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl FieldSource for User {
//!     fn field_value(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "id" => Some(self.id.into()),
//!             "name" => Some(self.name.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Entity for User {
//!     fn descriptor() -> &'static TableDescriptor {
//!         static DESCRIPTOR: OnceLock<TableDescriptor> = OnceLock::new();
//!         DESCRIPTOR.get_or_init(|| {
//!             TableDescriptor::new("User")
//!                 .with_table("public", "users")
//!                 .key("id", "id")
//!                 .column("name", "name")
//!         })
//!     }
//!
//!     fn from_row(r: Row) -> Result<Self, RowError> {
//!         let [name] = r.into_array()?;
//!         Ok(User { id: 0, name: row::convert("name", name)? })
//!     }
//! }
//!
//! assert_eq!(User::descriptor().entity, "User");
//! ```

use crate::descriptor::TableDescriptor;
use crate::error::RowError;
use crate::row::Row;
use crate::value::Value;

/// Read access to an instance's field values by field name.
pub trait FieldSource {
    /// Returns the current value of `field`, or `None` if the instance does
    /// not expose it.
    fn field_value(&self, field: &str) -> Option<Value>;
}

/// A type mapped to a table.
pub trait Entity: FieldSource + Sized {
    /// The type's table descriptor, built once.
    fn descriptor() -> &'static TableDescriptor;

    /// Builds an instance from a row holding one value per column-bound
    /// field, in declaration order.
    fn from_row(row: Row) -> Result<Self, RowError>;
}

impl<S: FieldSource + ?Sized> FieldSource for &S {
    fn field_value(&self, field: &str) -> Option<Value> {
        (**self).field_value(field)
    }
}

impl FieldSource for std::collections::BTreeMap<String, Value> {
    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }
}
