//! Result rows handed to per-type conversions.
//!
//! A [`Row`] holds one value per column-bound field of the mapped type, in
//! the same order as the descriptor's column list. Conversions either read
//! values by position or name, or destructure the whole row through
//! [`Row::into_array`], which enforces the conversion's arity.
//!
//! # Examples
//!
//! ```
//! use tablemap_core::{Row, RowError, Value};
//!
//! let row = Row::new(
//!     vec!["name".into(), "age".into()],
//!     vec![Value::from("Ada"), Value::from(36)],
//! );
//! let name: String = row.get_by_name("name").unwrap();
//! assert_eq!(name, "Ada");
//!
//! let err = row.into_array::<3>().unwrap_err();
//! assert_eq!(err, RowError::ArityMismatch { expected: 3, found: 2 });
//! ```

use crate::error::RowError;
use crate::value::{FromValue, Value};

/// One result record, read in column-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row. `columns` and `values` are paired by position.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Number of values in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Converts the value at `index`.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T, RowError> {
        let value = self
            .values
            .get(index)
            .ok_or(RowError::ColumnOutOfRange {
                index,
                len: self.values.len(),
            })?;
        convert(self.column_name(index), value.clone())
    }

    /// Converts the value of the named column.
    pub fn get_by_name<T: FromValue>(&self, column: &str) -> Result<T, RowError> {
        let index = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| RowError::UnknownColumn(column.to_string()))?;
        self.get(index)
    }

    /// Splits the row into exactly `N` values.
    ///
    /// This is the arity check of row materialization: a conversion taking
    /// `N` values only ever sees rows of exactly `N` values.
    pub fn into_array<const N: usize>(self) -> Result<[Value; N], RowError> {
        let found = self.values.len();
        self.values
            .try_into()
            .map_err(|_| RowError::ArityMismatch { expected: N, found })
    }

    fn column_name(&self, index: usize) -> String {
        self.columns
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }
}

/// Converts one value taken out of a row, naming `column` on failure.
///
/// Useful together with [`Row::into_array`]:
///
/// ```
/// use tablemap_core::{Row, Value, row};
///
/// let r = Row::new(vec!["id".into()], vec![Value::from(7)]);
/// let [id] = r.into_array::<1>().unwrap();
/// let id: i64 = row::convert("id", id).unwrap();
/// assert_eq!(id, 7);
/// ```
pub fn convert<T: FromValue>(column: impl Into<String>, value: Value) -> Result<T, RowError> {
    let found = value.kind();
    T::from_value(value).ok_or_else(|| RowError::TypeMismatch {
        column: column.into(),
        expected: T::EXPECTED,
        found,
    })
}
