//! Connection configuration.
//!
//! A [`ConnectionConfig`] names the database file backing the `main` scheme
//! and any further schemes, each backed by its own file and attached under
//! its scheme name, so that `scheme.table` in generated SQL resolves.
//!
//! # Example YAML
//!
//! ```yaml
//! database: app.db
//! schemes:
//!   public: public.db
//!   audit: audit.db
//! busy_timeout_ms: 5000
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for [`ConnectionFactory`](crate::ConnectionFactory).
///
/// # Examples
///
/// ```
/// use tablemap_sqlite::ConnectionConfig;
///
/// let config = ConnectionConfig::new("app.db")
///     .with_scheme("public", "public.db")
///     .with_busy_timeout_ms(2000);
/// assert_eq!(config.schemes.len(), 1);
/// assert_eq!(config.busy_timeout_ms, Some(2000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database file opened as the `main` scheme.
    pub database: PathBuf,
    /// Additional schemes, attached by name from their own files.
    #[serde(default)]
    pub schemes: BTreeMap<String, PathBuf>,
    /// How long SQLite waits on a locked database before failing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
}

impl ConnectionConfig {
    /// Creates a configuration with only the `main` scheme.
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            schemes: BTreeMap::new(),
            busy_timeout_ms: None,
        }
    }

    /// Adds a scheme backed by the given database file.
    pub fn with_scheme(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.schemes.insert(name.into(), path.into());
        self
    }

    /// Sets the busy timeout.
    pub fn with_busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout_ms = Some(millis);
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// Relative database paths are taken as-is (relative to the working
    /// directory), not to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::StoreError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::StoreError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
