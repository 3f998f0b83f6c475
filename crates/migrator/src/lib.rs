//! Migrator crate: moves the IMDB catalog from Postgres into MongoDB.
//!
//! This crate wires the extract side (`extract`) to the document shaping
//! (`catalog`) and writes the result to the document store.

pub mod config;
pub mod error;
pub mod loader;

pub use config::{DEFAULT_MONGO_PORT, MigrateConfig, MongoConfig};
pub use error::{DUPLICATE_KEY_CODE, MigrateError, Result, is_duplicate_key};
pub use loader::{ConflictPolicy, LoadOptions, LoadSummary, Migrator, connect_mongo};
