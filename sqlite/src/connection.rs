//! Connection factory.
//!
//! [`ConnectionFactory`] opens a fresh [`Connection`] per call from an
//! explicit [`ConnectionConfig`]. The connection is released when the
//! returned value is dropped; callers scope it to a single statement.

use std::time::Duration;

use rusqlite::{Connection, params};
use tablemap_core::is_identifier;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::{Result, StoreError};

/// Scheme name SQLite gives the primary database.
pub const MAIN_SCHEME: &str = "main";

/// Opens connections from a fixed configuration.
///
/// # Examples
///
/// ```no_run
/// use tablemap_sqlite::{ConnectionConfig, ConnectionFactory};
///
/// let factory = ConnectionFactory::new(
///     ConnectionConfig::new("app.db").with_scheme("public", "public.db"),
/// )
/// .unwrap();
/// let conn = factory.acquire().unwrap();
/// conn.execute_batch("CREATE TABLE IF NOT EXISTS public.users (id INTEGER, name TEXT)")
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    config: ConnectionConfig,
}

impl ConnectionFactory {
    /// Creates a factory for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidScheme`] if a scheme name is not a plain
    /// identifier or shadows `main`/`temp`.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        for name in config.schemes.keys() {
            validate_scheme(name)?;
        }
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Opens a connection with every configured scheme attached.
    pub fn acquire(&self) -> Result<Connection> {
        debug!(database = %self.config.database.display(), "opening connection");
        let conn = Connection::open(&self.config.database)?;

        if let Some(millis) = self.config.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(millis))?;
        }

        for (name, path) in &self.config.schemes {
            debug!(scheme = %name, path = %path.display(), "attaching scheme");
            conn.execute(
                &format!("ATTACH DATABASE ?1 AS {name}"),
                params![path.to_string_lossy()],
            )?;
        }

        Ok(conn)
    }
}

fn validate_scheme(name: &str) -> Result<()> {
    let reserved = name.eq_ignore_ascii_case(MAIN_SCHEME) || name.eq_ignore_ascii_case("temp");
    if reserved || !is_identifier(name) {
        return Err(StoreError::InvalidScheme(name.to_string()));
    }
    Ok(())
}
