//! Bookkeeping table configuration
//!
//! Table and column names are interpolated into the engine's schema
//! statements, so they are restricted to a safe identifier alphabet at
//! construction time. Version-key values are never interpolated; the engine
//! binds them as parameters.

use crate::domain::result::{Error, Result};

/// Default bookkeeping table name.
pub const DEFAULT_TABLE: &str = "migrations";

/// Default version-key column name.
pub const DEFAULT_COLUMN: &str = "mts";

const MAX_IDENTIFIER_LEN: usize = 64;

/// Names of the bookkeeping table and its key column.
///
/// This table is the only persisted state the engine owns; its schema must
/// stay stable across engine versions so existing deployments keep their
/// applied-migration history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    table: String,
    column: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            column: DEFAULT_COLUMN.to_string(),
        }
    }
}

impl MigrationConfig {
    /// Create a config with custom table and column names.
    ///
    /// Both must match `[A-Za-z_][A-Za-z0-9_]*` and be at most 64 characters;
    /// anything else is rejected with [`Error::Config`].
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Result<Self> {
        let table = table.into();
        let column = column.into();
        validate_identifier(&table)?;
        validate_identifier(&column)?;
        Ok(Self { table, column })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                && name.len() <= MAX_IDENTIFIER_LEN
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid identifier: {name:?}")))
    }
}
