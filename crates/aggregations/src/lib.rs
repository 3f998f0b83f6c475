//! Analytical queries and secondary indexes over the migrated catalog.
//!
//! This crate provides:
//! - `CatalogQuery` trait and the five standard queries
//! - `QueryRunner` for executing queries with timing
//! - `IndexBuilder` for the four supporting indexes
//!
//! ## Example Usage
//! ```ignore
//! use aggregations::{IndexBuilder, QueryRunner, standard_queries};
//!
//! let runner = QueryRunner::new(database.clone());
//! let before = runner.run_all(&standard_queries()).await?;
//!
//! IndexBuilder::new(database.clone()).create_all().await?;
//! let after = runner.run_all(&standard_queries()).await?;
//! ```

pub mod indexes;
pub mod queries;
pub mod runner;
pub mod traits;

// Re-export main types
pub use indexes::{IndexBuilder, IndexSpec, standard_indexes};
pub use queries::standard_queries;
pub use runner::{QueryReport, QueryRunner};
pub use traits::CatalogQuery;
