//! Stratum Core - transactional, forward-only schema migrations
//!
//! This crate implements the migration engine following hexagonal architecture:
//!
//! - **domain**: Core entities (MigrationSet, version keys, errors)
//! - **ports**: Trait definitions for external dependencies (Connection, ProgressReporter)
//! - **services**: The migration engine
//! - **adapters**: Concrete implementations (DuckDB, test mock)
//!
//! A pass applies every registered migration whose version key has no row in
//! the bookkeeping table yet, oldest key first, each inside its own
//! transaction together with the insert of its bookkeeping row. The pass
//! stops at the first failure; committed migrations stay applied, and
//! re-running is always safe.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types at crate root
pub use config::MigrationConfig;
pub use domain::{Error, MigrationFn, MigrationSet, Result, VersionKey};
pub use ports::{
    Connection, LineReporter, NoopReporter, ProgressReporter, SqlExecutor, Transaction, Value,
};
pub use services::{MigrationReport, MigrationService};

/// Apply all pending migrations with the default configuration.
///
/// Equivalent to `MigrationService::new().apply(conn, set)`.
pub fn apply(conn: &mut dyn Connection, set: &MigrationSet) -> Result<MigrationReport> {
    MigrationService::new().apply(conn, set)
}
