//! # Catalog Migrator
//!
//! Coordinates the one-way load from the relational store into the
//! document store:
//! 1. Prepare the target collections (optionally drop them)
//! 2. Extract members, shape, insert into `Members`
//! 3. Convert `movie.avgrating` to floating point
//! 4. Extract movies and all actor roles, shape, insert into `Movies`
//!
//! Everything runs on one Postgres connection and one MongoDB client, one
//! document per round trip. The first failure aborts the run; documents
//! already written stay written.

use std::time::Instant;

use mongodb::bson::{Document, doc};
use mongodb::options::ReplaceOptions;
use mongodb::{Client, Database};
use tracing::{debug, info, warn};

use catalog::{
    CatalogDocument, MEMBERS, MOVIES, MemberDocument, MovieDocument, group_actor_roles,
};
use extract::{MovieScope, PgSource, SchemaChange};

use crate::config::{MigrateConfig, MongoConfig};
use crate::error::{MigrateError, Result, is_duplicate_key};

/// What to do when a document's `_id` is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Plain insert; a repeated `_id` aborts the run with `DuplicateKey`
    #[default]
    Fail,
    /// Replace the stored document (insert when missing)
    Upsert,
}

/// Knobs for a load run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub conflict: ConflictPolicy,
    /// Drop `Members` and `Movies` before loading
    pub drop_existing: bool,
    /// Which movie rows are copied
    pub movies: MovieScope,
}

/// Counts reported at the end of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub members: usize,
    pub movies: usize,
    pub schema: SchemaChange,
}

/// Open the document store and check it answers before any work starts.
pub async fn connect_mongo(config: &MongoConfig) -> Result<Database> {
    config.validate()?;
    info!("Connecting to MongoDB at {}", config.uri());

    let client = Client::with_uri_str(config.uri())
        .await
        .map_err(MigrateError::mongo("connect"))?;
    let database = client.database(&config.database);

    database
        .run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(MigrateError::mongo("ping"))?;

    Ok(database)
}

/// Extract, transform and load with explicit connection handles.
pub struct Migrator {
    source: PgSource,
    database: Database,
    options: LoadOptions,
}

impl Migrator {
    pub fn new(source: PgSource, database: Database, options: LoadOptions) -> Self {
        Self {
            source,
            database,
            options,
        }
    }

    /// Validate `config` and connect to both stores.
    pub async fn connect(config: &MigrateConfig, options: LoadOptions) -> Result<Self> {
        config.validate()?;
        let source = PgSource::connect(&config.postgres).await?;
        let database = connect_mongo(&config.mongo).await?;
        Ok(Self::new(source, database, options))
    }

    /// Run the whole load: members, schema fix, movies.
    pub async fn run(&mut self) -> Result<LoadSummary> {
        let start_time = Instant::now();

        self.prepare_targets().await?;
        let members = self.load_members().await?;
        let schema = self.fix_schema().await?;
        let movies = self.load_movies().await?;

        info!(
            "Loaded {} members and {} movies in {:.2?}",
            members,
            movies,
            start_time.elapsed()
        );
        Ok(LoadSummary {
            members,
            movies,
            schema,
        })
    }

    /// Drop both target collections when `drop_existing` is set.
    pub async fn prepare_targets(&self) -> Result<()> {
        if !self.options.drop_existing {
            return Ok(());
        }
        for name in [MEMBERS, MOVIES] {
            warn!("Dropping collection {}", name);
            self.database
                .collection::<Document>(name)
                .drop(None)
                .await
                .map_err(MigrateError::mongo("drop collection"))?;
        }
        Ok(())
    }

    /// Copy every member row into `Members`; returns how many were written.
    pub async fn load_members(&mut self) -> Result<usize> {
        let rows = self.source.members().await?;
        info!("Loading {} members", rows.len());

        let mut written = 0;
        for row in rows {
            self.store(&MemberDocument::from(row)).await?;
            written += 1;
        }
        Ok(written)
    }

    pub async fn fix_schema(&mut self) -> Result<SchemaChange> {
        Ok(self.source.ensure_float_rating().await?)
    }

    /// Copy every movie into `Movies`, with its actors and their roles.
    pub async fn load_movies(&mut self) -> Result<usize> {
        let rows = self.source.movies(self.options.movies).await?;
        let mut cast = group_actor_roles(self.source.actor_roles().await?);
        info!("Loading {} movies ({} with cast)", rows.len(), cast.len());

        let mut written = 0;
        for row in rows {
            let actors = cast.remove(&row.id).unwrap_or_default();
            self.store(&MovieDocument::from_row(row, actors)).await?;
            written += 1;
        }

        if !cast.is_empty() {
            warn!(
                "{} movies in actor_movie_role were not loaded; their roles were skipped",
                cast.len()
            );
        }
        Ok(written)
    }

    /// Write one document according to the conflict policy.
    async fn store<T: CatalogDocument>(&self, document: &T) -> Result<()> {
        let collection = self.database.collection::<Document>(T::COLLECTION);
        let encoded = document.to_document()?;
        let id = document.id();

        let outcome = match self.options.conflict {
            ConflictPolicy::Fail => collection.insert_one(encoded, None).await.map(|_| ()),
            ConflictPolicy::Upsert => {
                let options = ReplaceOptions::builder().upsert(true).build();
                collection
                    .replace_one(doc! { "_id": id }, encoded, options)
                    .await
                    .map(|_| ())
            }
        };

        outcome.map_err(|source| {
            if is_duplicate_key(&source) {
                MigrateError::DuplicateKey {
                    collection: T::COLLECTION,
                    id,
                }
            } else {
                MigrateError::Mongo {
                    operation: "write",
                    source,
                }
            }
        })?;

        debug!("Stored {} document {}", T::COLLECTION, id);
        Ok(())
    }

    /// The document store handle, for running queries after a load.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Release the Postgres connection.
    pub async fn close(self) -> Result<()> {
        self.source.close().await?;
        Ok(())
    }
}
