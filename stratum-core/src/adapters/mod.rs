//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the connection port
//! - An in-memory mock connection with scriptable failure points for tests

pub mod duckdb;

#[cfg(test)]
pub mod mock;
