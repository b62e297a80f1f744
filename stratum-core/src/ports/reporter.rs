//! Progress reporter port
//!
//! Observability hook around each applied migration. The engine calls it
//! with no effect on control flow; when the caller supplies no reporter the
//! pass is fully silent.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::registry::VersionKey;

/// Receives progress notifications from a migration pass.
///
/// All methods default to no-ops, so implementations override only the
/// events they care about.
pub trait ProgressReporter: Send + Sync {
    /// A pending migration is about to run.
    fn migration_started(&self, _key: VersionKey) {}

    /// A migration committed, with the time its transaction took.
    fn migration_applied(&self, _key: VersionKey, _elapsed: Duration) {}
}

/// Silent reporter used when the caller supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}

/// Reporter that writes one formatted line per event.
///
/// Write failures are swallowed: progress output must never fail a pass.
pub struct LineReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> LineReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> ProgressReporter for LineReporter<W> {
    fn migration_started(&self, key: VersionKey) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "applying migration {key}");
        }
    }

    fn migration_applied(&self, key: VersionKey, elapsed: Duration) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(
                out,
                "applied migration {key} in {:.5}s",
                elapsed.as_secs_f64()
            );
        }
    }
}
