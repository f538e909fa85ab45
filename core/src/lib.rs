//! Table mapping core: descriptors, SQL literals and statement composition.
//!
//! This crate turns a type's table metadata into SQL text without touching a
//! database:
//!
//! - [`TableDescriptor`] — the scheme/table a type maps to and its field
//!   bindings (column and/or key), in declaration order.
//! - [`Entity`] / [`FieldSource`] — what a mapped type implements: a static
//!   descriptor, field access by name, and a row conversion.
//! - [`Value`] — runtime field values and their SQL literal form.
//! - [`metadata`] — table info, column/key name lists and literal value
//!   lists extracted from a descriptor.
//! - [`sql`] — INSERT, UPDATE, DELETE and SELECT composition.
//! - [`Row`] — result rows handed to [`Entity::from_row`].
//!
//! Values are substituted into statements as literals, without parameter
//! binding and without escaping embedded quotes. Callers mapping untrusted
//! text must account for that.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use tablemap_core::*;
//!
//! let users = TableDescriptor::new("User")
//!     .with_table("public", "users")
//!     .keyed_column("id", "id", "id")
//!     .column("name", "name");
//!
//! let mut bob = BTreeMap::new();
//! bob.insert("id".to_string(), Value::from(2));
//! bob.insert("name".to_string(), Value::from("Bob"));
//!
//! assert_eq!(
//!     sql::update(&users, &bob).unwrap(),
//!     "UPDATE public.users SET id = 2, name = 'Bob' WHERE id = 2"
//! );
//! assert!(validate_descriptor(&users).is_empty());
//! ```

mod descriptor;
mod entity;
mod error;
pub mod metadata;
pub mod row;
pub mod sql;
mod validate;
mod value;

pub use descriptor::{BindingKind, FieldBinding, TableBinding, TableDescriptor};
pub use entity::{Entity, FieldSource};
pub use error::{MappingError, RowError};
pub use row::Row;
pub use validate::{ValidationError, is_identifier, validate_descriptor};
pub use value::{FromValue, Value};
