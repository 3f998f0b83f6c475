//! Relational side of the catalog migration.
//!
//! This crate provides:
//! - `PostgresConfig`: validated connection parameters
//! - `PgSource`: a single Postgres connection plus the extraction queries
//! - the one-time `movie.avgrating` schema fix
//!
//! ## Example Usage
//! ```ignore
//! let mut source = PgSource::connect(&config).await?;
//! let members = source.members().await?;
//! source.ensure_float_rating().await?;
//! let movies = source.movies(MovieScope::Complete).await?;
//! let roles = source.actor_roles().await?;
//! ```

pub mod config;
pub mod error;
pub mod source;

pub use config::{DEFAULT_PORT, PostgresConfig};
pub use error::{ExtractError, Result};
pub use source::{MovieScope, PgSource, SchemaChange};
