//! Statement execution for mapped types.
//!
//! [`Repository`] derives SQL from a type's descriptor, runs it on a freshly
//! acquired connection and, for reads, materializes the rows. Each operation
//! is one statement on one connection; the connection is dropped before the
//! operation returns, on success and on error alike. There are no
//! transactions beyond SQLite's autocommit.
//!
//! Every typed operation has a descriptor-level twin (`*_record`,
//! `*_rows`, `*_in`) for callers whose descriptors are only known at run
//! time.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::OnceLock;
//! # use tablemap_core::{Entity, FieldSource, Row, RowError, TableDescriptor, Value, row};
//! use tablemap_sqlite::{ConnectionConfig, ConnectionFactory, Repository};
//! # struct User { id: i64, name: String }
//! # impl FieldSource for User {
//! #     fn field_value(&self, field: &str) -> Option<Value> {
//! #         match field {
//! #             "id" => Some(self.id.into()),
//! #             "name" => Some(self.name.as_str().into()),
//! #             _ => None,
//! #         }
//! #     }
//! # }
//! # impl Entity for User {
//! #     fn descriptor() -> &'static TableDescriptor {
//! #         static D: OnceLock<TableDescriptor> = OnceLock::new();
//! #         D.get_or_init(|| TableDescriptor::new("User")
//! #             .with_table("public", "users")
//! #             .keyed_column("id", "id", "id")
//! #             .column("name", "name"))
//! #     }
//! #     fn from_row(r: Row) -> Result<Self, RowError> {
//! #         let [id, name] = r.into_array()?;
//! #         Ok(User { id: row::convert("id", id)?, name: row::convert("name", name)? })
//! #     }
//! # }
//!
//! let factory = ConnectionFactory::new(
//!     ConnectionConfig::new("app.db").with_scheme("public", "public.db"),
//! )
//! .unwrap();
//! let repo = Repository::new(factory);
//!
//! repo.insert(&User { id: 1, name: "Alice".into() }).unwrap();
//! let alice: Option<User> = repo.select_by_id(&1).unwrap();
//! assert_eq!(alice.unwrap().name, "Alice");
//! ```

use std::fmt::Display;

use rusqlite::Connection;
use tablemap_core::{Entity, FieldSource, MappingError, Row, TableDescriptor, metadata, sql};
use tracing::{debug, warn};

use crate::connection::ConnectionFactory;
use crate::convert::{materialize, read_rows};
use crate::error::Result;

/// Runs mapped-type CRUD operations against a [`ConnectionFactory`].
#[derive(Debug, Clone)]
pub struct Repository {
    factory: ConnectionFactory,
}

impl Repository {
    /// Creates a repository that acquires its connections from `factory`.
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }

    /// Returns the connection factory.
    pub fn factory(&self) -> &ConnectionFactory {
        &self.factory
    }

    /// Inserts an instance's column-bound fields.
    ///
    /// Returns `true` if exactly one row was inserted.
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<bool> {
        self.insert_record(E::descriptor(), entity)
    }

    /// Updates the row(s) matching the instance's key fields.
    ///
    /// Returns `true` if at least one row changed. A type without key fields
    /// updates every row of its table.
    pub fn update<E: Entity>(&self, entity: &E) -> Result<bool> {
        self.update_record(E::descriptor(), entity)
    }

    /// Deletes every row whose columns all equal the instance's current
    /// field values.
    ///
    /// Returns `true` if at least one row was deleted.
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<bool> {
        self.delete_record(E::descriptor(), entity)
    }

    /// Deletes the row whose first key equals `id`.
    ///
    /// Returns `true` if exactly one row was deleted.
    pub fn delete_by_id<E: Entity>(&self, id: &dyn Display) -> Result<bool> {
        self.delete_by_id_in(E::descriptor(), id)
    }

    /// Loads every row of the type's table.
    pub fn select_all<E: Entity>(&self) -> Result<Vec<E>> {
        let rows = self.select_all_rows(E::descriptor())?;
        materialize(rows)
    }

    /// Loads the first row whose first key's column equals `id`.
    ///
    /// Returns `None` when no row matches.
    pub fn select_by_id<E: Entity>(&self, id: &dyn Display) -> Result<Option<E>> {
        match self.select_by_id_row(E::descriptor(), id)? {
            Some(row) => Ok(Some(E::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Descriptor-level [`insert`](Self::insert).
    pub fn insert_record(
        &self,
        descriptor: &TableDescriptor,
        source: &dyn FieldSource,
    ) -> Result<bool> {
        let statement = sql::insert(descriptor, source).inspect_err(log_mapping_error)?;
        Ok(self.execute(&statement)? == 1)
    }

    /// Descriptor-level [`update`](Self::update).
    pub fn update_record(
        &self,
        descriptor: &TableDescriptor,
        source: &dyn FieldSource,
    ) -> Result<bool> {
        let statement = sql::update(descriptor, source).inspect_err(log_mapping_error)?;
        Ok(self.execute(&statement)? > 0)
    }

    /// Descriptor-level [`delete`](Self::delete).
    pub fn delete_record(
        &self,
        descriptor: &TableDescriptor,
        source: &dyn FieldSource,
    ) -> Result<bool> {
        let statement = sql::delete(descriptor, source).inspect_err(log_mapping_error)?;
        Ok(self.execute(&statement)? > 0)
    }

    /// Descriptor-level [`delete_by_id`](Self::delete_by_id).
    pub fn delete_by_id_in(&self, descriptor: &TableDescriptor, id: &dyn Display) -> Result<bool> {
        let statement = sql::delete_by_id(descriptor, id).inspect_err(log_mapping_error)?;
        Ok(self.execute(&statement)? == 1)
    }

    /// Descriptor-level [`select_all`](Self::select_all), returning raw rows.
    pub fn select_all_rows(&self, descriptor: &TableDescriptor) -> Result<Vec<Row>> {
        let statement = sql::select_all(descriptor).inspect_err(log_mapping_error)?;
        self.query(&statement, &metadata::column_names(descriptor), None)
    }

    /// Descriptor-level [`select_by_id`](Self::select_by_id), returning the
    /// raw row.
    pub fn select_by_id_row(
        &self,
        descriptor: &TableDescriptor,
        id: &dyn Display,
    ) -> Result<Option<Row>> {
        let statement = sql::select_by_id(descriptor, id).inspect_err(log_mapping_error)?;
        let rows = self.query(&statement, &metadata::column_names(descriptor), Some(1))?;
        Ok(rows.into_iter().next())
    }

    fn connect(&self) -> Result<Connection> {
        self.factory.acquire().inspect_err(|e| {
            warn!(
                database = %self.factory.config().database.display(),
                error = %e,
                "failed to acquire connection"
            );
        })
    }

    /// Runs a write statement and returns the affected-row count.
    fn execute(&self, statement: &str) -> Result<usize> {
        debug!(sql = %statement, "executing statement");
        let conn = self.connect()?;
        let affected = conn.execute(statement, []).inspect_err(|e| {
            warn!(sql = %statement, error = %e, "statement failed");
        })?;
        debug!(affected, "statement finished");
        Ok(affected)
    }

    /// Runs a read statement and materializes `columns` from each row.
    fn query(&self, statement: &str, columns: &[&str], limit: Option<usize>) -> Result<Vec<Row>> {
        debug!(sql = %statement, "running query");
        let conn = self.connect()?;
        read_query(&conn, statement, columns, limit).inspect_err(|e| {
            warn!(sql = %statement, error = %e, "query failed");
        })
    }
}

fn log_mapping_error(e: &MappingError) {
    warn!(error = %e, "cannot build statement");
}

fn read_query(
    conn: &Connection,
    statement: &str,
    columns: &[&str],
    limit: Option<usize>,
) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(statement)?;
    read_rows(&mut stmt, columns, limit)
}
