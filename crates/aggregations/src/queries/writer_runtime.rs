//! Query 2.3: average runtime per living writer matching a name.

use mongodb::bson::{Document, doc};

use super::{alive, contains, lookup_members, unwind};
use crate::traits::CatalogQuery;

/// Average runtime of the movies written by each living writer whose name
/// contains `name_fragment` (any case).
///
/// Grouped by the looked-up writer id set; returns `{ avgruntime }` rows.
#[derive(Debug, Clone)]
pub struct WriterAverageRuntime {
    pub name_fragment: String,
}

impl Default for WriterAverageRuntime {
    fn default() -> Self {
        Self {
            name_fragment: "Bhardwaj".to_string(),
        }
    }
}

impl CatalogQuery for WriterAverageRuntime {
    fn name(&self) -> &str {
        "2.3"
    }

    fn describe(&self) -> String {
        format!("Average runtime for living writers named '*{}*'", self.name_fragment)
    }

    fn pipeline(&self) -> Vec<Document> {
        vec![
            unwind("writers"),
            lookup_members("writers", "member_writers"),
            doc! {
                "$match": {
                    "$and": [
                        { "member_writers.name": contains(&self.name_fragment) },
                        alive("member_writers"),
                    ]
                }
            },
            doc! {
                "$group": {
                    "_id": { "writerids": "$member_writers._id" },
                    "avgruntime": { "$avg": "$runtime" },
                }
            },
            doc! { "$project": { "_id": 0, "avgruntime": 1 } },
        ]
    }
}
