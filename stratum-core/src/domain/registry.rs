//! Migration set - the in-memory registry of versioned migration bodies
//!
//! Keys are 64-bit integers, conventionally the Unix timestamp at authoring
//! time. The set itself is unordered; the engine sorts keys ascending before
//! applying, never relying on map iteration order.

use std::collections::HashMap;
use std::fmt;

use crate::domain::result::{Error, Result};
use crate::ports::{SqlExecutor, Transaction};

/// Version identifier of a single migration unit.
///
/// Doubles as the apply-order sort key: lower keys run first.
pub type VersionKey = i64;

/// A migration body. Runs inside one transaction; its effects and the
/// bookkeeping row for its key commit or roll back together.
pub type MigrationFn = Box<dyn Fn(&mut dyn Transaction) -> Result<()> + Send + Sync>;

/// Registry of migration bodies keyed by version.
///
/// Built once per process and read-only during a pass.
#[derive(Default)]
pub struct MigrationSet {
    entries: HashMap<VersionKey, MigrationFn>,
}

impl MigrationSet {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a migration body under a version key.
    ///
    /// Re-registering a key is rejected with [`Error::DuplicateKey`] rather
    /// than silently overwriting: two bodies under one version is a
    /// programming error, and with overwrite the survivor would be whichever
    /// registration happened to run last.
    pub fn register<F>(&mut self, key: VersionKey, body: F) -> Result<()>
    where
        F: Fn(&mut dyn Transaction) -> Result<()> + Send + Sync + 'static,
    {
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        self.entries.insert(key, Box::new(body));
        Ok(())
    }

    /// Register a migration that executes a fixed list of statements in
    /// order, stopping at the first statement error.
    ///
    /// Sugar over [`register`](Self::register): the statements become an
    /// ordinary body closure.
    pub fn register_statements<I, S>(&mut self, key: VersionKey, statements: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let statements: Vec<String> = statements.into_iter().map(Into::into).collect();
        self.register(key, move |tx| {
            for sql in &statements {
                tx.execute(sql, &[])?;
            }
            Ok(())
        })
    }

    /// Registered version keys, in no particular order.
    pub fn keys(&self) -> Vec<VersionKey> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (VersionKey, &MigrationFn)> {
        self.entries.iter().map(|(key, body)| (*key, body))
    }

    #[cfg(test)]
    pub(crate) fn body(&self, key: VersionKey) -> Option<&MigrationFn> {
        self.entries.get(&key)
    }
}

impl fmt::Debug for MigrationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationSet")
            .field("keys", &self.keys())
            .finish()
    }
}
