//! Table descriptors: the static mapping from a Rust type to a table.
//!
//! A [`TableDescriptor`] names the scheme and table a type is stored in and
//! lists its fields in declaration order. Each [`FieldBinding`] may carry a
//! column binding, a key binding, or both. The descriptor is plain data: it
//! can be built in code through the builder methods or loaded from YAML.
//!
//! # Examples
//!
//! ```
//! use tablemap_core::TableDescriptor;
//!
//! let users = TableDescriptor::new("User")
//!     .with_table("public", "users")
//!     .key("id", "id")
//!     .column("name", "name");
//!
//! assert_eq!(users.fields.len(), 2);
//! assert_eq!(users.table.as_ref().unwrap().qualified_name(), "public.users");
//! ```

use serde::{Deserialize, Serialize};

/// Which binding a field is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Plain column binding.
    Column,
    /// Identity (key) binding.
    Key,
}

/// The scheme and table a type maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBinding {
    /// Scheme (database namespace) the table lives in.
    pub scheme: String,
    /// Table name within the scheme.
    pub name: String,
}

impl TableBinding {
    /// Creates a table binding.
    pub fn new(scheme: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            name: name.into(),
        }
    }

    /// Returns `scheme.table` as it appears in SQL text.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablemap_core::TableBinding;
    ///
    /// assert_eq!(TableBinding::new("main", "orders").qualified_name(), "main.orders");
    /// ```
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.scheme, self.name)
    }
}

/// Binding of one in-memory field to a column name and/or a key name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    /// Name of the field on the Rust type.
    pub field: String,
    /// Column name, if the field is column-bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Key name, if the field is part of the table's identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl FieldBinding {
    /// Returns the name this field is bound to for the given kind.
    pub fn name_for(&self, kind: BindingKind) -> Option<&str> {
        match kind {
            BindingKind::Column => self.column.as_deref(),
            BindingKind::Key => self.key.as_deref(),
        }
    }

    /// Returns true if the field carries a binding of the given kind.
    pub fn has(&self, kind: BindingKind) -> bool {
        self.name_for(kind).is_some()
    }
}

/// Complete mapping of a type to a table.
///
/// Field order is declaration order; every list derived from the descriptor
/// (column names, key names, literal values) follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Name of the mapped type, used in error messages.
    pub entity: String,
    /// Table binding; a descriptor without one cannot produce SQL.
    #[serde(default)]
    pub table: Option<TableBinding>,
    /// Field bindings in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldBinding>,
}

impl TableDescriptor {
    /// Creates an empty descriptor for the named type.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Sets the table binding.
    pub fn with_table(mut self, scheme: impl Into<String>, name: impl Into<String>) -> Self {
        self.table = Some(TableBinding::new(scheme, name));
        self
    }

    /// Appends a column-bound field.
    pub fn column(self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.field(FieldBinding {
            field: field.into(),
            column: Some(column.into()),
            key: None,
        })
    }

    /// Appends a key-bound field.
    pub fn key(self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.field(FieldBinding {
            field: field.into(),
            column: None,
            key: Some(key.into()),
        })
    }

    /// Appends a field that is both a column and a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablemap_core::{BindingKind, TableDescriptor};
    ///
    /// let d = TableDescriptor::new("Order")
    ///     .with_table("main", "orders")
    ///     .keyed_column("id", "order_id", "id");
    /// assert!(d.fields[0].has(BindingKind::Column));
    /// assert!(d.fields[0].has(BindingKind::Key));
    /// ```
    pub fn keyed_column(
        self,
        field: impl Into<String>,
        column: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.field(FieldBinding {
            field: field.into(),
            column: Some(column.into()),
            key: Some(key.into()),
        })
    }

    /// Appends an arbitrary field binding.
    pub fn field(mut self, binding: FieldBinding) -> Self {
        self.fields.push(binding);
        self
    }

    /// Iterates the fields carrying a binding of the given kind.
    pub fn bound_fields(&self, kind: BindingKind) -> impl Iterator<Item = &FieldBinding> {
        self.fields.iter().filter(move |f| f.has(kind))
    }
}
