//! Error types for the migrator crate.

use catalog::CatalogError;
use extract::ExtractError;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use thiserror::Error;

/// Server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that abort a migration run
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Connection parameters were rejected before connecting
    #[error("Invalid MongoDB configuration: {0}")]
    InvalidConfig(String),

    /// Reading from the relational store failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A row could not be shaped into a document
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The target collection already holds this `_id`
    ///
    /// Raised on reruns with `ConflictPolicy::Fail`; clear the collections
    /// (or load with `--drop-existing` / `--on-conflict upsert`) first.
    #[error("{collection} already contains a document with _id {id}")]
    DuplicateKey {
        collection: &'static str,
        id: i64,
    },

    /// Any other document store failure
    #[error("MongoDB {operation} failed")]
    Mongo {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
}

impl MigrateError {
    pub(crate) fn mongo(operation: &'static str) -> impl FnOnce(mongodb::error::Error) -> Self {
        move |source| MigrateError::Mongo { operation, source }
    }
}

/// True when a write was rejected for violating a unique index.
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY_CODE,
            ..
        }))
    )
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, MigrateError>;
