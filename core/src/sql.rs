//! SQL statement composition from table descriptors.
//!
//! Pure string building; nothing here touches a database. Values are
//! embedded as literals produced by
//! [`Value::to_sql_literal`](crate::Value::to_sql_literal), so statement
//! text is exactly what the database will run.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use tablemap_core::{TableDescriptor, Value, sql};
//!
//! let users = TableDescriptor::new("User")
//!     .with_table("public", "users")
//!     .key("id", "id")
//!     .column("name", "name");
//!
//! let mut alice = BTreeMap::new();
//! alice.insert("id".to_string(), Value::from(1));
//! alice.insert("name".to_string(), Value::from("Alice"));
//!
//! assert_eq!(
//!     sql::insert(&users, &alice).unwrap(),
//!     "INSERT INTO public.users (name) VALUES ('Alice')"
//! );
//! assert_eq!(
//!     sql::delete_by_id(&users, &1).unwrap(),
//!     "DELETE FROM public.users WHERE id = 1"
//! );
//! ```

use std::fmt::Display;

use crate::descriptor::{BindingKind, TableDescriptor};
use crate::entity::FieldSource;
use crate::error::MappingError;
use crate::metadata::{
    column_names, field_values, first_key_field, key_names, literal_values, table_info,
};
use crate::value::Value;

/// `INSERT INTO {scheme}.{table} (c1,c2) VALUES (v1,v2)` over the
/// column-bound fields. Key-only fields are left out.
pub fn insert(
    descriptor: &TableDescriptor,
    source: &dyn FieldSource,
) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    let columns = column_names(descriptor);
    let values = literal_values(descriptor, source, BindingKind::Column)?;

    Ok(format!(
        "INSERT INTO {}.{} ({}) VALUES ({})",
        table.scheme,
        table.name,
        columns.join(","),
        values.join(",")
    ))
}

/// `UPDATE {scheme}.{table} SET c1 = v1, c2 = v2 WHERE k1 = kv1 AND k2 = kv2`.
///
/// With no key-bound fields the WHERE clause is omitted and the statement
/// updates every row of the table.
pub fn update(
    descriptor: &TableDescriptor,
    source: &dyn FieldSource,
) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    let columns = column_names(descriptor);
    let values = literal_values(descriptor, source, BindingKind::Column)?;
    let keys = key_names(descriptor);
    let key_values = field_values(descriptor, source, BindingKind::Key)?;

    let mut sql = format!(
        "UPDATE {}.{} SET {}",
        table.scheme,
        table.name,
        pairs(&columns, &values, ", ")
    );
    if !keys.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions(&keys, &key_values));
    }
    Ok(sql)
}

/// `DELETE FROM {scheme}.{table} WHERE c1 = v1 AND c2 = v2` matching every
/// column-bound field's current value. Null values match with `IS NULL`.
///
/// # Errors
///
/// Returns [`MappingError::NoColumns`] when there is nothing to match on.
pub fn delete(
    descriptor: &TableDescriptor,
    source: &dyn FieldSource,
) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    let columns = column_names(descriptor);
    if columns.is_empty() {
        return Err(MappingError::NoColumns {
            entity: descriptor.entity.clone(),
        });
    }
    let values = field_values(descriptor, source, BindingKind::Column)?;

    Ok(format!(
        "DELETE FROM {}.{} WHERE {}",
        table.scheme,
        table.name,
        conditions(&columns, &values)
    ))
}

/// `DELETE FROM {scheme}.{table} WHERE {key} = {id}` using the key name of
/// the first key field. The id is written through `Display`, unquoted.
pub fn delete_by_id(
    descriptor: &TableDescriptor,
    id: &dyn Display,
) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    let field = first_key_field(descriptor)?;
    let key = field.key.as_deref().unwrap_or_default();

    Ok(format!(
        "DELETE FROM {}.{} WHERE {} = {}",
        table.scheme, table.name, key, id
    ))
}

/// `SELECT * FROM {scheme}.{table}`.
pub fn select_all(descriptor: &TableDescriptor) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    Ok(format!("SELECT * FROM {}.{}", table.scheme, table.name))
}

/// `SELECT * FROM {scheme}.{table} WHERE {column} = {id}`.
///
/// Filters on the COLUMN name of the first key field, not its key name;
/// the two differ when a field is declared with distinct names.
///
/// # Errors
///
/// Returns [`MappingError::KeyWithoutColumn`] if the first key field has no
/// column binding.
pub fn select_by_id(
    descriptor: &TableDescriptor,
    id: &dyn Display,
) -> Result<String, MappingError> {
    let table = table_info(descriptor)?;
    let field = first_key_field(descriptor)?;
    let column = field
        .column
        .as_deref()
        .ok_or_else(|| MappingError::KeyWithoutColumn {
            entity: descriptor.entity.clone(),
            field: field.field.clone(),
        })?;

    Ok(format!(
        "SELECT * FROM {}.{} WHERE {} = {}",
        table.scheme, table.name, column, id
    ))
}

fn pairs(names: &[&str], values: &[String], separator: &str) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name} = {value}"))
        .collect::<Vec<_>>()
        .join(separator)
}

/// WHERE terms joined with AND; null values become `IS NULL`.
fn conditions(names: &[&str], values: &[Value]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| {
            if value.is_null() {
                format!("{name} IS NULL")
            } else {
                format!("{name} = {}", value.to_sql_literal())
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn user() -> TableDescriptor {
        TableDescriptor::new("User")
            .with_table("public", "users")
            .key("id", "id")
            .column("name", "name")
    }

    fn values(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn account() -> TableDescriptor {
        TableDescriptor::new("Account")
            .with_table("bank", "accounts")
            .keyed_column("number", "acct_no", "number")
            .key("branch", "branch")
            .column("owner", "owner")
            .column("balance", "balance")
    }

    fn account_values() -> BTreeMap<String, Value> {
        values(&[
            ("number", Value::from(1001)),
            ("branch", Value::from("north")),
            ("owner", Value::from("Kim")),
            ("balance", Value::from(250)),
        ])
    }

    #[test]
    fn test_insert_excludes_key_only_fields() {
        let alice = values(&[("id", Value::from(1)), ("name", Value::from("Alice"))]);
        assert_eq!(
            insert(&user(), &alice).unwrap(),
            "INSERT INTO public.users (name) VALUES ('Alice')"
        );
    }

    #[test]
    fn test_insert_lists_have_equal_length_and_order() {
        assert_eq!(
            insert(&account(), &account_values()).unwrap(),
            "INSERT INTO bank.accounts (acct_no,owner,balance) VALUES (1001,'Kim',250)"
        );
    }

    #[test]
    fn test_update_set_and_where_clauses() {
        assert_eq!(
            update(&account(), &account_values()).unwrap(),
            "UPDATE bank.accounts SET acct_no = 1001, owner = 'Kim', balance = 250 \
             WHERE number = 1001 AND branch = 'north'"
        );
    }

    #[test]
    fn test_update_without_keys_is_unconditional() {
        let d = TableDescriptor::new("Setting")
            .with_table("main", "settings")
            .column("theme", "theme");
        let v = values(&[("theme", Value::from("dark"))]);
        assert_eq!(
            update(&d, &v).unwrap(),
            "UPDATE main.settings SET theme = 'dark'"
        );
    }

    #[test]
    fn test_delete_matches_all_columns() {
        assert_eq!(
            delete(&account(), &account_values()).unwrap(),
            "DELETE FROM bank.accounts WHERE acct_no = 1001 AND owner = 'Kim' AND balance = 250"
        );
    }

    #[test]
    fn test_null_values_match_with_is_null() {
        let mut v = account_values();
        v.insert("owner".to_string(), Value::Null);
        v.insert("branch".to_string(), Value::Null);

        assert_eq!(
            delete(&account(), &v).unwrap(),
            "DELETE FROM bank.accounts WHERE acct_no = 1001 AND owner IS NULL AND balance = 250"
        );
        assert_eq!(
            update(&account(), &v).unwrap(),
            "UPDATE bank.accounts SET acct_no = 1001, owner = NULL, balance = 250 \
             WHERE number = 1001 AND branch IS NULL"
        );
    }

    #[test]
    fn test_delete_without_columns_is_refused() {
        let d = TableDescriptor::new("Marker")
            .with_table("main", "markers")
            .key("id", "id");
        let v = values(&[("id", Value::from(1))]);
        assert_eq!(
            delete(&d, &v),
            Err(MappingError::NoColumns {
                entity: "Marker".to_string()
            })
        );
    }

    #[test]
    fn test_delete_by_id_uses_first_key_name() {
        assert_eq!(
            delete_by_id(&user(), &1).unwrap(),
            "DELETE FROM public.users WHERE id = 1"
        );
        assert_eq!(
            delete_by_id(&account(), &"7").unwrap(),
            "DELETE FROM bank.accounts WHERE number = 7"
        );
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select_all(&user()).unwrap(), "SELECT * FROM public.users");
    }

    #[test]
    fn test_select_by_id_uses_column_name_of_first_key() {
        assert_eq!(
            select_by_id(&account(), &1001).unwrap(),
            "SELECT * FROM bank.accounts WHERE acct_no = 1001"
        );
    }

    #[test]
    fn test_select_by_id_requires_key_column() {
        assert_eq!(
            select_by_id(&user(), &1),
            Err(MappingError::KeyWithoutColumn {
                entity: "User".to_string(),
                field: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_by_id_without_key() {
        let d = TableDescriptor::new("Log")
            .with_table("main", "log")
            .column("line", "line");
        assert!(matches!(
            delete_by_id(&d, &1),
            Err(MappingError::MissingKey { .. })
        ));
        assert!(matches!(
            select_by_id(&d, &1),
            Err(MappingError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_missing_table_fails_every_statement() {
        let d = TableDescriptor::new("Loose").keyed_column("id", "id", "id");
        let v = values(&[("id", Value::from(1))]);
        assert!(insert(&d, &v).is_err());
        assert!(update(&d, &v).is_err());
        assert!(delete(&d, &v).is_err());
        assert!(delete_by_id(&d, &1).is_err());
        assert!(select_all(&d).is_err());
        assert!(select_by_id(&d, &1).is_err());
    }
}
