//! SQLite execution for tablemap.
//!
//! This crate runs the statements composed by [`tablemap_core`] against
//! SQLite and turns result rows back into instances.
//!
//! # Architecture
//!
//! - **`config`** — [`ConnectionConfig`], YAML-loadable database settings
//! - **`connection`** — [`ConnectionFactory`], one fresh connection per call
//!   with every configured scheme attached
//! - **`convert`** — row materialization (SQLite values into [`Row`]s)
//! - **`repository`** — [`Repository`], the six CRUD operations
//!
//! # Schemes
//!
//! Statements address tables as `scheme.table`. In SQLite a scheme is a
//! database name: `main` is the configured database file and every other
//! scheme is attached from its own file under its scheme name.
//!
//! # Quick start
//!
//! ```no_run
//! use tablemap_core::{TableDescriptor, Value};
//! use tablemap_sqlite::{ConnectionConfig, ConnectionFactory, Repository};
//! use std::collections::BTreeMap;
//!
//! let factory = ConnectionFactory::new(ConnectionConfig::new("app.db")).unwrap();
//! factory
//!     .acquire()
//!     .unwrap()
//!     .execute_batch("CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY, body TEXT)")
//!     .unwrap();
//!
//! let notes = TableDescriptor::new("Note")
//!     .with_table("main", "notes")
//!     .keyed_column("id", "id", "id")
//!     .column("body", "body");
//!
//! let mut note = BTreeMap::new();
//! note.insert("id".to_string(), Value::from(1));
//! note.insert("body".to_string(), Value::from("remember the milk"));
//!
//! let repo = Repository::new(factory);
//! assert!(repo.insert_record(&notes, &note).unwrap());
//! let row = repo.select_by_id_row(&notes, &1).unwrap().unwrap();
//! assert_eq!(row.get_by_name::<String>("body").unwrap(), "remember the milk");
//! ```
//!
//! [`Row`]: tablemap_core::Row

mod config;
mod connection;
mod convert;
mod error;
mod repository;

pub use config::ConnectionConfig;
pub use connection::{ConnectionFactory, MAIN_SCHEME};
pub use error::{Result, StoreError};
pub use repository::Repository;
