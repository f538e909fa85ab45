//! Row materialization: SQLite result rows into [`Row`]s and instances.
//!
//! Each result row is read by column name, one value per column-bound field
//! of the descriptor and in the descriptor's order, whatever order `SELECT *`
//! returns the table's columns in. The resulting [`Row`] is handed to the
//! type's conversion.

use rusqlite::Statement;
use rusqlite::types::Value as SqlValue;
use tablemap_core::{Entity, Row, Value};

use crate::error::Result;

/// Converts a SQLite storage value into a field [`Value`].
///
/// SQLite has no boolean or timestamp storage class; those come back as
/// integers and text and are converted by [`FromValue`](tablemap_core::FromValue).
pub(crate) fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(i),
        SqlValue::Real(r) => Value::Real(r),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Blob(b),
    }
}

/// Runs a prepared query and reads every result row, taking `columns` by
/// name in the given order.
///
/// Stops after `limit` rows when one is given.
pub(crate) fn read_rows(
    stmt: &mut Statement<'_>,
    columns: &[&str],
    limit: Option<usize>,
) -> Result<Vec<Row>> {
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();

    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for column in columns {
            values.push(from_sql_value(row.get::<_, SqlValue>(*column)?));
        }
        out.push(Row::new(
            columns.iter().map(|c| c.to_string()).collect(),
            values,
        ));
        if limit.is_some_and(|l| out.len() >= l) {
            break;
        }
    }

    Ok(out)
}

/// Builds instances of `E` from materialized rows, failing on the first row
/// the conversion rejects.
pub(crate) fn materialize<E: Entity>(rows: Vec<Row>) -> Result<Vec<E>> {
    let mut entities = Vec::with_capacity(rows.len());
    for row in rows {
        entities.push(E::from_row(row)?);
    }
    Ok(entities)
}
