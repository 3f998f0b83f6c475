//! Query 2.2: producers with many movies of one genre in one year.

use mongodb::bson::{Document, doc};

use super::{contains, count_above, lookup_members, unwind};
use crate::traits::CatalogQuery;

/// Producers whose name contains `name_fragment` (any case) with strictly
/// more than `min_count` movies of `genre` released in `year`.
///
/// Returns `{ _id: producer id, count }`.
#[derive(Debug, Clone)]
pub struct ProlificProducers {
    pub name_fragment: String,
    pub year: i32,
    pub genre: String,
    pub min_count: i64,
}

impl Default for ProlificProducers {
    fn default() -> Self {
        Self {
            name_fragment: "Gill".to_string(),
            year: 2017,
            genre: "Talk-Show".to_string(),
            min_count: 50,
        }
    }
}

impl CatalogQuery for ProlificProducers {
    fn name(&self) -> &str {
        "2.2"
    }

    fn describe(&self) -> String {
        format!(
            "Producers named '*{}*' with more than {} {} movies in {}",
            self.name_fragment, self.min_count, self.genre, self.year
        )
    }

    fn pipeline(&self) -> Vec<Document> {
        let mut pipeline = vec![
            unwind("producers"),
            lookup_members("producers", "member_producers"),
            unwind("member_producers"),
            unwind("genres"),
            doc! {
                "$match": {
                    "$and": [
                        { "member_producers.name": contains(&self.name_fragment) },
                        { "startyear": { "$eq": self.year } },
                        { "genres": self.genre.as_str() },
                    ]
                }
            },
        ];
        pipeline.extend(count_above("$member_producers._id", self.min_count));
        pipeline.push(doc! { "$project": { "_id": 1, "count": 1 } });
        pipeline
    }
}
