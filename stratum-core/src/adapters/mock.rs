//! Mock connection for engine tests
//!
//! Implements the connection port over plain in-memory state so tests can
//! script a failure at every boundary the engine crosses. Committed rows
//! stand in for the bookkeeping table; an open transaction stages its writes
//! in a buffer, so commit/rollback visibility matches a real store.
//!
//! Convention: a statement whose first parameter is an integer is treated as
//! a bookkeeping access for that key (the engine's status check and record
//! insert); parameterless statements are logged verbatim.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::domain::result::{Error, Result};
use crate::ports::{Connection, SqlExecutor, Transaction, Value};

/// Failure switches, one per engine boundary
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFailures {
    /// Fail the bookkeeping CREATE TABLE
    pub create: bool,
    /// Fail the applied-or-pending check
    pub status_check: bool,
    /// Fail transaction begin
    pub begin: bool,
    /// Fail any bookkeeping insert inside a transaction
    pub insert: bool,
    /// Fail commit
    pub commit: bool,
    /// Report every key as unapplied even when its row exists, so the
    /// bookkeeping insert collides with the primary key - the losing side
    /// of two passes racing on the same key
    pub stale_status_check: bool,
}

#[derive(Debug, Default)]
struct State {
    rows: BTreeSet<i64>,
    log: Vec<String>,
}

/// In-memory connection double with scriptable failure points
pub struct MockConnection {
    state: Arc<Mutex<State>>,
    failures: MockFailures,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self::with_failures(MockFailures::default())
    }

    pub fn with_failures(failures: MockFailures) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            failures,
        }
    }

    /// A second connection over this one's underlying store, as another
    /// process racing on the same database would hold
    pub fn share(&self, failures: MockFailures) -> Self {
        Self {
            state: Arc::clone(&self.state),
            failures,
        }
    }

    /// Committed bookkeeping rows, ascending
    pub fn rows(&self) -> Vec<i64> {
        self.state.lock().unwrap().rows.iter().copied().collect()
    }

    /// Committed statements, in execution order
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// Pre-seed a bookkeeping row without running anything
    pub fn seed_row(&self, key: i64) {
        self.state.lock().unwrap().rows.insert(key);
    }
}

impl SqlExecutor for MockConnection {
    fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<()> {
        if self.failures.create && sql.contains("CREATE TABLE") {
            return Err(Error::other("create table refused"));
        }
        self.state.lock().unwrap().log.push(sql.to_string());
        Ok(())
    }

    fn query_scalar(&mut self, _sql: &str, params: &[Value]) -> Result<Option<i64>> {
        if self.failures.status_check {
            return Err(Error::other("status check refused"));
        }
        if self.failures.stale_status_check {
            return Ok(None);
        }
        let key = match params.first() {
            Some(Value::Int(key)) => *key,
            _ => return Ok(None),
        };
        let state = self.state.lock().unwrap();
        Ok(state.rows.contains(&key).then_some(1))
    }
}

impl Connection for MockConnection {
    fn begin(&mut self) -> Result<Box<dyn Transaction + '_>> {
        if self.failures.begin {
            return Err(Error::other("begin refused"));
        }
        Ok(Box::new(MockTransaction {
            state: Arc::clone(&self.state),
            failures: self.failures,
            staged_rows: Vec::new(),
            staged_log: Vec::new(),
        }))
    }
}

/// Transaction double: writes stage locally and publish on commit
pub struct MockTransaction {
    state: Arc<Mutex<State>>,
    failures: MockFailures,
    staged_rows: Vec<i64>,
    staged_log: Vec<String>,
}

impl SqlExecutor for MockTransaction {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        match params.first() {
            Some(Value::Int(key)) => {
                if self.failures.insert {
                    return Err(Error::other("insert refused"));
                }
                let conflict = {
                    let state = self.state.lock().unwrap();
                    state.rows.contains(key) || self.staged_rows.contains(key)
                };
                if conflict {
                    return Err(Error::other(format!(
                        "primary key constraint violated: {key}"
                    )));
                }
                self.staged_rows.push(*key);
            }
            _ => self.staged_log.push(sql.to_string()),
        }
        Ok(())
    }

    fn query_scalar(&mut self, _sql: &str, params: &[Value]) -> Result<Option<i64>> {
        let key = match params.first() {
            Some(Value::Int(key)) => *key,
            _ => return Ok(None),
        };
        let state = self.state.lock().unwrap();
        let present = state.rows.contains(&key) || self.staged_rows.contains(&key);
        Ok(present.then_some(1))
    }
}

impl Transaction for MockTransaction {
    fn commit(self: Box<Self>) -> Result<()> {
        if self.failures.commit {
            return Err(Error::other("commit refused"));
        }
        let mut state = self.state.lock().unwrap();
        state.rows.extend(self.staged_rows.iter().copied());
        state.log.extend(self.staged_log.iter().cloned());
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        // Staged writes are simply dropped.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_publishes_staged_writes() {
        let mut conn = MockConnection::new();
        let mut tx = conn.begin().unwrap();
        tx.execute("CREATE TABLE x (id BIGINT)", &[]).unwrap();
        tx.execute("INSERT INTO migrations (mts) VALUES (?)", &[Value::Int(3)])
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(conn.rows(), vec![3]);
        assert_eq!(conn.log(), vec!["CREATE TABLE x (id BIGINT)".to_string()]);
    }

    #[test]
    fn test_rollback_discards_staged_writes() {
        let mut conn = MockConnection::new();
        let mut tx = conn.begin().unwrap();
        tx.execute("INSERT INTO migrations (mts) VALUES (?)", &[Value::Int(3)])
            .unwrap();
        tx.rollback().unwrap();

        assert!(conn.rows().is_empty());
        assert!(conn.log().is_empty());
    }

    #[test]
    fn test_duplicate_key_conflicts() {
        let mut conn = MockConnection::new();
        conn.seed_row(3);

        let mut tx = conn.begin().unwrap();
        let err = tx
            .execute("INSERT INTO migrations (mts) VALUES (?)", &[Value::Int(3)])
            .unwrap_err();
        assert!(err.to_string().contains("constraint"));
    }

    #[test]
    fn test_shared_connections_see_one_store() {
        let a = MockConnection::new();
        a.seed_row(1);
        let mut b = a.share(MockFailures::default());

        let seen = b
            .query_scalar("SELECT 1 FROM migrations WHERE mts = ?", &[Value::Int(1)])
            .unwrap();
        assert_eq!(seen, Some(1));
    }
}
