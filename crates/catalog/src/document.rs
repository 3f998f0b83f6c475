//! Shaping relational rows into nested documents.
//!
//! This is the "transform" step of the migration:
//! - `MemberRow` -> `MemberDocument` (one to one)
//! - `MovieRow` + its actors -> `MovieDocument`
//! - the flat (movie, actor, roles) result set -> per-movie actor lists
//!
//! Association sets are normalized here (sorted, de-duplicated, empty -> absent)
//! so the field-absence rule holds no matter what the source query returns.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use mongodb::bson::{self, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, Result};
use crate::types::*;

/// A document that belongs to one of the catalog collections.
pub trait CatalogDocument: Serialize + DeserializeOwned {
    /// Collection this document is stored in
    const COLLECTION: &'static str;

    /// Value of the document's `_id` field
    fn id(&self) -> i64;

    /// Encode as a BSON document, ready for insertion.
    fn to_document(&self) -> Result<Document> {
        bson::to_document(self).map_err(|source| CatalogError::Encode {
            collection: Self::COLLECTION,
            id: self.id(),
            source,
        })
    }

    /// Decode a document read back from the store.
    fn from_document(document: Document) -> Result<Self> {
        Ok(bson::from_document(document)?)
    }
}

impl CatalogDocument for MemberDocument {
    const COLLECTION: &'static str = MEMBERS;

    fn id(&self) -> i64 {
        self.id
    }
}

impl CatalogDocument for MovieDocument {
    const COLLECTION: &'static str = MOVIES;

    fn id(&self) -> i64 {
        self.id
    }
}

impl From<MemberRow> for MemberDocument {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            birthyear: row.birthyear,
            deathyear: row.deathyear,
        }
    }
}

impl MovieDocument {
    /// Build a movie document from its row and the actors attached to it.
    ///
    /// An empty `actors` list leaves the field absent, same as a movie with
    /// no `actor_movie_role` rows in the source.
    pub fn from_row(row: MovieRow, actors: Vec<ActorRoles>) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            title: row.title,
            originaltitle: row.originaltitle,
            startyear: row.startyear,
            endyear: row.endyear,
            runtime: row.runtime,
            avgrating: row.avgrating,
            numvotes: row.numvotes,
            genres: distinct(row.genres),
            directors: distinct(row.directors),
            writers: distinct(row.writers),
            producers: distinct(row.producers),
            actors: if actors.is_empty() { None } else { Some(actors) },
        }
    }
}

/// Sort and de-duplicate an aggregate; an empty set becomes `None`.
fn distinct<T: Ord>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    let mut values = values?;
    values.sort();
    values.dedup();
    if values.is_empty() { None } else { Some(values) }
}

/// Group the flat actor/role result set by movie.
///
/// Within a movie, actors are ordered by id and each actor appears once;
/// repeated (movie, actor) rows have their role names merged.
pub fn group_actor_roles(
    rows: impl IntoIterator<Item = ActorRoleRow>,
) -> HashMap<MovieId, Vec<ActorRoles>> {
    let mut grouped: HashMap<MovieId, BTreeMap<MemberId, BTreeSet<String>>> = HashMap::new();

    for row in rows {
        grouped
            .entry(row.movie)
            .or_default()
            .entry(row.actor)
            .or_default()
            .extend(row.roles.unwrap_or_default());
    }

    grouped
        .into_iter()
        .map(|(movie, actors)| {
            let actors = actors
                .into_iter()
                .map(|(actor, roles)| ActorRoles {
                    actor,
                    roles: roles.into_iter().collect(),
                })
                .collect();
            (movie, actors)
        })
        .collect()
}
