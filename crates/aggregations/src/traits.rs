//! Core trait for the query runner.
//!
//! A query is nothing more than a named aggregation pipeline over one
//! collection. Execution (and timing) belongs to the `QueryRunner`.

use catalog::MOVIES;
use mongodb::bson::Document;

/// An aggregation the runner can execute.
///
/// ## Design Note
/// - `Send + Sync` so boxed queries can be shared with async tasks
/// - `pipeline()` builds a fresh pipeline on every call; the runner owns it
pub trait CatalogQuery: Send + Sync {
    /// Short label used in logs and timing lines (e.g. "2.1")
    fn name(&self) -> &str;

    /// One-line, human readable statement of what the query asks
    fn describe(&self) -> String;

    /// Collection the pipeline starts from
    fn collection(&self) -> &str {
        MOVIES
    }

    /// The aggregation stages, in order
    fn pipeline(&self) -> Vec<Document>;
}
