//! Core domain types for the IMDB catalog migration.
//!
//! Two families of types live here:
//! - **Rows**: what the relational store hands back (`FromRow` structs)
//! - **Documents**: what gets written to the document store (serde structs)
//!
//! The document types encode "unknown" as an absent field, never as null.
//! Every optional field carries `skip_serializing_if = "Option::is_none"`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a cast/crew member (`member.id` in the relational store)
pub type MemberId = i64;

/// Identifier of a movie (`movie.id` in the relational store)
pub type MovieId = i64;

// =============================================================================
// Names
// =============================================================================

/// Database used on the document store when none is configured
pub const DEFAULT_DATABASE: &str = "IMDB";

/// Collection holding one [`MemberDocument`] per relational member row
pub const MEMBERS: &str = "Members";

/// Collection holding one [`MovieDocument`] per relational movie row
pub const MOVIES: &str = "Movies";

// =============================================================================
// Relational Rows
// =============================================================================

/// One row of `SELECT id, name, birthyear, deathyear FROM member`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MemberRow {
    pub id: MemberId,
    pub name: String,
    pub birthyear: Option<i32>,
    pub deathyear: Option<i32>,
}

/// One movie with its scalar columns and the distinct aggregates of its
/// association tables.
///
/// An aggregate is `None` when the movie has no rows in that association
/// table (`array_agg` over zero rows yields NULL).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieRow {
    pub id: MovieId,
    /// The `type` column (renamed: `type` is a Rust keyword)
    pub kind: Option<String>,
    pub title: Option<String>,
    pub originaltitle: Option<String>,
    pub startyear: Option<i32>,
    pub endyear: Option<i32>,
    pub runtime: Option<i32>,
    pub avgrating: Option<f64>,
    pub numvotes: Option<i64>,
    pub genres: Option<Vec<String>>,
    pub directors: Option<Vec<MemberId>>,
    pub writers: Option<Vec<MemberId>>,
    pub producers: Option<Vec<MemberId>>,
}

/// The role names one actor played in one movie.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ActorRoleRow {
    pub movie: MovieId,
    pub actor: MemberId,
    pub roles: Option<Vec<String>>,
}

// =============================================================================
// Documents
// =============================================================================

/// A document in the `Members` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDocument {
    #[serde(rename = "_id")]
    pub id: MemberId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthyear: Option<i32>,
    /// Absent means "living or unknown"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deathyear: Option<i32>,
}

/// One entry of a movie's `actors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRoles {
    pub actor: MemberId,
    /// Omitted when none of the actor's role ids resolve to a name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// A document in the `Movies` collection.
///
/// Field names match the relational column names so the aggregation
/// pipelines can refer to them directly (`$runtime`, `$startyear`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    #[serde(rename = "_id")]
    pub id: MovieId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originaltitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startyear: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endyear: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avgrating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<MemberId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writers: Option<Vec<MemberId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producers: Option<Vec<MemberId>>,
    /// Ordered by ascending actor id, one entry per actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<ActorRoles>>,
}
