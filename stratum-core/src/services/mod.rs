//! Service layer
//!
//! The migration engine lives here. It orchestrates the domain types and
//! ports into a pass; everything stateful it touches sits behind a port.

pub mod migration;

pub use migration::{MigrationReport, MigrationService};
