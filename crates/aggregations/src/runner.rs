//! The QueryRunner executes catalog queries against the document store.
//!
//! Every query is run to completion: the cursor is drained into memory
//! before the report is returned. Timing covers the round trip plus the
//! full cursor drain.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::Document;
use tracing::{debug, info};

use crate::traits::CatalogQuery;

/// Result rows and wall-clock time of one query.
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub name: String,
    pub description: String,
    pub rows: Vec<Document>,
    pub elapsed: Duration,
}

/// Runs aggregation pipelines on one database handle.
#[derive(Clone)]
pub struct QueryRunner {
    database: Database,
}

impl QueryRunner {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Run one query and materialize its results.
    pub async fn run(&self, query: &dyn CatalogQuery) -> Result<QueryReport> {
        let collection = self.database.collection::<Document>(query.collection());
        let pipeline = query.pipeline();
        debug!(
            "Running query {} ({} stages) on {}",
            query.name(),
            pipeline.len(),
            query.collection()
        );

        let start = Instant::now();
        let cursor = collection
            .aggregate(pipeline, None)
            .await
            .with_context(|| format!("Failed to start query {}", query.name()))?;
        let rows: Vec<Document> = cursor
            .try_collect()
            .await
            .with_context(|| format!("Failed to read results of query {}", query.name()))?;
        let elapsed = start.elapsed();

        info!(
            "Query {} returned {} rows in {:.2?}",
            query.name(),
            rows.len(),
            elapsed
        );

        Ok(QueryReport {
            name: query.name().to_string(),
            description: query.describe(),
            rows,
            elapsed,
        })
    }

    /// Run queries one after another, stopping at the first failure.
    pub async fn run_all(&self, queries: &[Box<dyn CatalogQuery>]) -> Result<Vec<QueryReport>> {
        let mut reports = Vec::with_capacity(queries.len());
        for query in queries {
            reports.push(self.run(query.as_ref()).await?);
        }
        Ok(reports)
    }
}
