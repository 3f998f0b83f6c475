//! Secondary indexes that speed up the catalog queries.
//!
//! Indexes change query latency, never query results. No existence check
//! is made before creating: re-creating an identical index is a no-op on
//! the server, while a conflicting definition under the same name fails.

use anyhow::{Context, Result};
use catalog::{MEMBERS, MOVIES};
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;

/// One index to create.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: Document,
    /// Explicit name; the server derives one from the keys when `None`
    pub name: Option<&'static str>,
    /// Stemming language for text indexes
    pub default_language: Option<&'static str>,
}

impl IndexSpec {
    fn ascending(collection: &'static str, field: &str) -> Self {
        let mut keys = Document::new();
        keys.insert(field, 1);
        Self {
            collection,
            keys,
            name: None,
            default_language: None,
        }
    }

    pub fn to_model(&self) -> IndexModel {
        let options = IndexOptions::builder()
            .name(self.name.map(str::to_string))
            .default_language(self.default_language.map(str::to_string))
            .build();

        IndexModel::builder()
            .keys(self.keys.clone())
            .options(options)
            .build()
    }
}

/// The four indexes used by the catalog queries.
pub fn standard_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec {
            collection: MEMBERS,
            keys: doc! { "name": "text" },
            name: Some("search_index"),
            default_language: Some("english"),
        },
        IndexSpec::ascending(MEMBERS, "deathyear"),
        IndexSpec::ascending(MOVIES, "genres"),
        IndexSpec::ascending(MEMBERS, "_id"),
    ]
}

/// Creates indexes on one database handle.
pub struct IndexBuilder {
    database: Database,
}

impl IndexBuilder {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Create each index in order; returns the names the server reports.
    pub async fn create(&self, specs: &[IndexSpec]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(specs.len());
        for spec in specs {
            let result = self
                .database
                .collection::<Document>(spec.collection)
                .create_index(spec.to_model(), None)
                .await
                .with_context(|| {
                    format!("Failed to create index {} on {}", spec.keys, spec.collection)
                })?;

            info!("Created index {} on {}", result.index_name, spec.collection);
            names.push(result.index_name);
        }
        Ok(names)
    }

    pub async fn create_all(&self) -> Result<Vec<String>> {
        self.create(&standard_indexes()).await
    }
}
