//! Connection port - database abstraction
//!
//! The engine drives the database exclusively through these traits; a driver
//! binding (see `adapters`) implements them for a concrete database. The
//! engine itself never names one.
//!
//! Statements use `?` positional placeholders. Values are always bound as
//! parameters, never interpolated into SQL.

use crate::domain::result::Result;

/// A parameter value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Statement execution surface shared by connections and transactions.
pub trait SqlExecutor {
    /// Execute a statement, discarding any result rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()>;

    /// Run a query expected to return at most one integer scalar.
    ///
    /// Returns `Ok(None)` when the query yields no row; a missing row is a
    /// distinguishable outcome, not an error.
    fn query_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<i64>>;
}

/// A live database connection.
pub trait Connection: SqlExecutor {
    /// Begin a transaction.
    ///
    /// At most one is open at a time; it must be committed or rolled back
    /// before the connection is used directly again.
    fn begin(&mut self) -> Result<Box<dyn Transaction + '_>>;
}

/// An open transaction with the same statement surface as the connection.
///
/// Dropping a transaction without committing must roll it back.
pub trait Transaction: SqlExecutor {
    fn commit(self: Box<Self>) -> Result<()>;

    fn rollback(self: Box<Self>) -> Result<()>;
}
