//! Query 2.1: living actors by name prefix, outside one release year.

use mongodb::bson::{Document, doc};

use super::{alive, lookup_members, starts_with, unwind};
use crate::traits::CatalogQuery;

/// Actors whose name starts with `prefix` (any case), who have no death
/// year, appearing in a movie not released in `excluded_year`.
///
/// Returns one `{ member_actors: [{ _id }] }` row per matching cast entry.
#[derive(Debug, Clone)]
pub struct AliveActorsByPrefix {
    pub prefix: String,
    pub excluded_year: i32,
}

impl Default for AliveActorsByPrefix {
    fn default() -> Self {
        Self {
            prefix: "Phi".to_string(),
            excluded_year: 2014,
        }
    }
}

impl CatalogQuery for AliveActorsByPrefix {
    fn name(&self) -> &str {
        "2.1"
    }

    fn describe(&self) -> String {
        format!(
            "Living actors named '{}*' in movies not released in {}",
            self.prefix, self.excluded_year
        )
    }

    fn pipeline(&self) -> Vec<Document> {
        vec![
            unwind("actors"),
            lookup_members("actors.actor", "member_actors"),
            doc! {
                "$match": {
                    "$and": [
                        { "member_actors.name": starts_with(&self.prefix) },
                        { "startyear": { "$ne": self.excluded_year } },
                        alive("member_actors"),
                    ]
                }
            },
            doc! { "$project": { "_id": 0, "member_actors._id": 1 } },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_shape() {
        let pipeline = AliveActorsByPrefix::default().pipeline();
        assert_eq!(pipeline.len(), 4);
        assert_eq!(pipeline[0].get_str("$unwind").unwrap(), "$actors");

        let and = pipeline[2]
            .get_document("$match")
            .unwrap()
            .get_array("$and")
            .unwrap();
        assert_eq!(and.len(), 3);

        let year = and[1].as_document().unwrap().get_document("startyear").unwrap();
        assert_eq!(year.get_i32("$ne").unwrap(), 2014);

        let living = and[2].as_document().unwrap();
        assert!(living.contains_key("member_actors.deathyear"));
    }
}
