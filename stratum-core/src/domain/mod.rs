//! Core domain types
//!
//! The migration set and the error/result types. Pure data structures -
//! no I/O happens at this layer.

pub mod registry;
pub mod result;

pub use registry::{MigrationFn, MigrationSet, VersionKey};
pub use result::{Error, Result};
