//! DuckDB driver binding for the connection port

use std::path::Path;

use duckdb::types::Value as DuckValue;
use duckdb::ToSql;

use crate::domain::result::{Error, Result};
use crate::ports::{Connection, SqlExecutor, Transaction, Value};

/// DuckDB-backed connection
pub struct DuckDbConnection {
    conn: duckdb::Connection,
}

impl DuckDbConnection {
    /// Open (creating if needed) a database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = duckdb::Connection::open(path).map_err(Error::database)?;
        Ok(Self { conn })
    }

    /// Open a transient in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = duckdb::Connection::open_in_memory().map_err(Error::database)?;
        Ok(Self { conn })
    }

    /// Wrap an existing DuckDB connection
    pub fn from_connection(conn: duckdb::Connection) -> Self {
        Self { conn }
    }
}

fn bind(params: &[Value]) -> Vec<DuckValue> {
    params
        .iter()
        .map(|p| match p {
            Value::Null => DuckValue::Null,
            Value::Int(v) => DuckValue::BigInt(*v),
            Value::Real(v) => DuckValue::Double(*v),
            Value::Text(v) => DuckValue::Text(v.clone()),
        })
        .collect()
}

fn execute_on(conn: &duckdb::Connection, sql: &str, params: &[Value]) -> Result<()> {
    let values = bind(params);
    let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    conn.execute(sql, refs.as_slice()).map_err(Error::database)?;
    Ok(())
}

fn query_scalar_on(conn: &duckdb::Connection, sql: &str, params: &[Value]) -> Result<Option<i64>> {
    let values = bind(params);
    let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    match conn.query_row(sql, refs.as_slice(), |row| row.get::<_, i64>(0)) {
        Ok(v) => Ok(Some(v)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e)),
    }
}

impl SqlExecutor for DuckDbConnection {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        execute_on(&self.conn, sql, params)
    }

    fn query_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
        query_scalar_on(&self.conn, sql, params)
    }
}

impl Connection for DuckDbConnection {
    fn begin(&mut self) -> Result<Box<dyn Transaction + '_>> {
        let tx = self.conn.transaction().map_err(Error::database)?;
        Ok(Box::new(DuckDbTransaction { tx }))
    }
}

/// Open DuckDB transaction. Dropped without commit, it rolls back.
pub struct DuckDbTransaction<'c> {
    tx: duckdb::Transaction<'c>,
}

impl SqlExecutor for DuckDbTransaction<'_> {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        execute_on(&self.tx, sql, params)
    }

    fn query_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<i64>> {
        query_scalar_on(&self.tx, sql, params)
    }
}

impl Transaction for DuckDbTransaction<'_> {
    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().map_err(Error::database)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().map_err(Error::database)
    }
}
