//! Migration engine - applies pending migrations in version order
//!
//! Each pending migration runs inside its own transaction together with the
//! insert of its bookkeeping row, so the migration's effects and the record
//! of its success commit or roll back as one. The pass stops at the first
//! failure; migrations committed before it stay applied, and re-running is
//! safe because recorded keys are skipped.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::MigrationConfig;
use crate::domain::registry::{MigrationFn, MigrationSet, VersionKey};
use crate::domain::result::{Error, Result};
use crate::ports::{Connection, NoopReporter, ProgressReporter, SqlExecutor, Value};

/// Result of a migration pass that ran to completion
#[derive(Debug, Default, Serialize)]
pub struct MigrationReport {
    /// Keys applied by this pass, in apply order
    pub applied: Vec<VersionKey>,
    /// Count of keys skipped because they were already recorded
    pub already_applied: usize,
}

/// Service that applies a migration set against a connection
pub struct MigrationService {
    config: MigrationConfig,
    reporter: Arc<dyn ProgressReporter>,
}

impl Default for MigrationService {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationService {
    /// Create a service with the default table configuration and no
    /// progress output
    pub fn new() -> Self {
        Self {
            config: MigrationConfig::default(),
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Use custom bookkeeping table/column names
    pub fn with_config(mut self, config: MigrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a progress reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Apply all pending migrations, oldest version first.
    ///
    /// Every registered key without a bookkeeping row runs in its own
    /// transaction; the pass stops at the first failure. Re-running after a
    /// failure is safe: committed keys are skipped on the next pass.
    pub fn apply(&self, conn: &mut dyn Connection, set: &MigrationSet) -> Result<MigrationReport> {
        let table = self.config.table();
        let column = self.config.column();

        // Create-if-absent, so concurrent initializers cannot corrupt state.
        conn.execute(
            &format!("CREATE TABLE IF NOT EXISTS {table} ({column} BIGINT PRIMARY KEY)"),
            &[],
        )
        .map_err(|e| Error::BookkeepingInit {
            source: Box::new(e),
        })?;

        let status_sql = format!("SELECT 1 FROM {table} WHERE {column} = ?");
        let record_sql = format!("INSERT INTO {table} ({column}) VALUES (?)");

        // Apply order is ascending by key, regardless of registration order:
        // later migrations may assume earlier schema state exists.
        let mut pending: Vec<(VersionKey, &MigrationFn)> = set.iter().collect();
        pending.sort_unstable_by_key(|(key, _)| *key);

        let mut report = MigrationReport::default();
        for (key, body) in pending {
            let recorded = conn
                .query_scalar(&status_sql, &[Value::Int(key)])
                .map_err(|e| Error::StatusCheck {
                    key,
                    source: Box::new(e),
                })?;
            if recorded.is_some() {
                report.already_applied += 1;
                continue;
            }

            self.reporter.migration_started(key);
            let started = Instant::now();

            let mut tx = conn.begin().map_err(|e| Error::Begin {
                key,
                source: Box::new(e),
            })?;

            if let Err(e) = body(tx.as_mut()) {
                let _ = tx.rollback();
                return Err(Error::Migration {
                    key,
                    source: Box::new(e),
                });
            }

            // Recorded in the same transaction as the body's effects. A
            // unique-constraint failure here means another pass won the race
            // for this key; it is reported, not swallowed.
            if let Err(e) = tx.execute(&record_sql, &[Value::Int(key)]) {
                let _ = tx.rollback();
                return Err(Error::Migration {
                    key,
                    source: Box::new(e),
                });
            }

            // A failed commit leaves no bookkeeping row, so the key is
            // treated as unapplied on the next pass.
            tx.commit().map_err(|e| Error::Commit {
                key,
                source: Box::new(e),
            })?;

            self.reporter.migration_applied(key, started.elapsed());
            report.applied.push(key);
        }

        Ok(report)
    }
}
