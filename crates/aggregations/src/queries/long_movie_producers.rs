//! Query 2.4: living producers with many long movies.

use mongodb::bson::{Document, doc};

use super::{alive, count_above, lookup_members, unwind};
use crate::traits::CatalogQuery;

/// Living producers with strictly more than `min_count` movies whose runtime
/// is strictly greater than `min_runtime` minutes.
///
/// "Greatest number" is read as anything above `min_count` (30 by default).
#[derive(Debug, Clone)]
pub struct LongMovieProducers {
    pub min_runtime: i32,
    pub min_count: i64,
}

impl Default for LongMovieProducers {
    fn default() -> Self {
        Self {
            min_runtime: 120,
            min_count: 30,
        }
    }
}

impl CatalogQuery for LongMovieProducers {
    fn name(&self) -> &str {
        "2.4"
    }

    fn describe(&self) -> String {
        format!(
            "Living producers with more than {} movies over {} minutes",
            self.min_count, self.min_runtime
        )
    }

    fn pipeline(&self) -> Vec<Document> {
        let mut pipeline = vec![
            unwind("producers"),
            lookup_members("producers", "member_producers"),
            unwind("member_producers"),
            doc! {
                "$match": {
                    "$and": [
                        alive("member_producers"),
                        { "runtime": { "$gt": self.min_runtime } },
                    ]
                }
            },
        ];
        pipeline.extend(count_above("$member_producers._id", self.min_count));
        pipeline.push(doc! { "$project": { "_id": 1 } });
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let query = LongMovieProducers {
            min_runtime: 90,
            min_count: 3,
        };
        let pipeline = query.pipeline();
        assert_eq!(pipeline.len(), 7);

        let and = pipeline[3]
            .get_document("$match")
            .unwrap()
            .get_array("$and")
            .unwrap();
        let runtime = and[1].as_document().unwrap().get_document("runtime").unwrap();
        assert_eq!(runtime.get_i32("$gt").unwrap(), 90);

        let count = pipeline[5]
            .get_document("$match")
            .unwrap()
            .get_document("count")
            .unwrap();
        assert_eq!(count.get_i64("$gt").unwrap(), 3);
    }
}
