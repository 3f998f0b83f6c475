//! Error types for the extract crate.

use thiserror::Error;

/// Errors raised while reading from (or fixing up) the relational store
///
/// Every variant aborts the run; nothing here is retried.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Connection parameters were rejected before connecting
    #[error("Invalid Postgres configuration: {0}")]
    InvalidConfig(String),

    /// Could not open the connection
    #[error("Failed to connect to Postgres database {database} on {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed (the label names which one)
    #[error("Query `{statement}` failed")]
    Query {
        statement: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The schema fix was asked for a column that does not exist
    #[error("Column {table}.{column} not found")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl ExtractError {
    pub(crate) fn query(statement: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| ExtractError::Query { statement, source }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ExtractError>;
