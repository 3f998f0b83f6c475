//! Error types for the catalog crate.

use mongodb::bson;
use thiserror::Error;

/// Errors that can occur while shaping rows into documents
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A document could not be encoded as BSON
    #[error("Failed to encode {collection} document {id} as BSON: {source}")]
    Encode {
        collection: &'static str,
        id: i64,
        #[source]
        source: bson::ser::Error,
    },

    /// A stored document did not decode into the expected shape
    #[error("Failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
