//! Query 2.5: movies by a director, starring an actor, in a genre.

use mongodb::bson::{Document, doc};

use super::{lookup_members, unwind};
use crate::traits::CatalogQuery;

/// Movies directed by `director` with `actor` in the cast and `genre` among
/// their genres. Names are matched exactly.
///
/// Returns `{ _id, title }`, once per matching cast entry.
#[derive(Debug, Clone)]
pub struct DirectorActorGenre {
    pub director: String,
    pub actor: String,
    pub genre: String,
}

impl Default for DirectorActorGenre {
    fn default() -> Self {
        Self {
            director: "James Cameron".to_string(),
            actor: "Sigourney Weaver".to_string(),
            genre: "Sci-Fi".to_string(),
        }
    }
}

impl CatalogQuery for DirectorActorGenre {
    fn name(&self) -> &str {
        "2.5"
    }

    fn describe(&self) -> String {
        format!(
            "{} movies directed by {} starring {}",
            self.genre, self.director, self.actor
        )
    }

    fn pipeline(&self) -> Vec<Document> {
        vec![
            lookup_members("directors", "member_directors"),
            unwind("actors"),
            lookup_members("actors.actor", "member_actors"),
            doc! {
                "$match": {
                    "$and": [
                        { "member_directors.name": self.director.as_str() },
                        { "member_actors.name": self.actor.as_str() },
                        { "genres": self.genre.as_str() },
                    ]
                }
            },
            doc! { "$project": { "_id": 1, "title": 1 } },
        ]
    }
}
