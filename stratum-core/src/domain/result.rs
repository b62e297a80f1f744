//! Result and error types for the core library

use thiserror::Error;

use crate::domain::registry::VersionKey;

/// Core library error type
///
/// Failures during a pass carry the version key they occurred at, with the
/// underlying cause wrapped (not replaced) so callers can inspect both.
#[derive(Error, Debug)]
pub enum Error {
    /// Failure surfaced by the underlying database driver
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The bookkeeping table could not be created; nothing was applied
    #[error("bookkeeping init failed: {source}")]
    BookkeepingInit {
        #[source]
        source: Box<Error>,
    },

    /// The applied-or-pending check failed for a key
    #[error("status check for migration {key} failed: {source}")]
    StatusCheck {
        key: VersionKey,
        #[source]
        source: Box<Error>,
    },

    /// A transaction could not be opened for a key
    #[error("could not begin transaction for migration {key}: {source}")]
    Begin {
        key: VersionKey,
        #[source]
        source: Box<Error>,
    },

    /// The migration body or its bookkeeping insert failed; the transaction
    /// was rolled back and the pass aborted
    #[error("migration {key} failed: {source}")]
    Migration {
        key: VersionKey,
        #[source]
        source: Box<Error>,
    },

    /// Commit failed. The migration's effect is indeterminate and is treated
    /// as unapplied; the next pass picks the key up again
    #[error("commit of migration {key} failed: {source}")]
    Commit {
        key: VersionKey,
        #[source]
        source: Box<Error>,
    },

    /// A version key was registered twice
    #[error("migration key {0} is already registered")]
    DuplicateKey(VersionKey),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a driver-level error
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Box::new(err))
    }

    /// Create a free-form error (useful in procedural migration bodies)
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// The version key the pass stopped at, if the failure is tied to one
    pub fn failed_key(&self) -> Option<VersionKey> {
        match self {
            Self::StatusCheck { key, .. }
            | Self::Begin { key, .. }
            | Self::Migration { key, .. }
            | Self::Commit { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
