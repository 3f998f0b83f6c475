//! The five fixed catalog queries.
//!
//! Each query lives in its own module and carries its constants as fields,
//! so tests (and the CLI) can run the same shape with other parameters.
//! `Default` gives the canonical values.

pub mod alive_actors;
pub mod director_actor_genre;
pub mod long_movie_producers;
pub mod prolific_producers;
pub mod writer_runtime;

pub use alive_actors::AliveActorsByPrefix;
pub use director_actor_genre::DirectorActorGenre;
pub use long_movie_producers::LongMovieProducers;
pub use prolific_producers::ProlificProducers;
pub use writer_runtime::WriterAverageRuntime;

use catalog::MEMBERS;
use mongodb::bson::{Document, doc};

use crate::traits::CatalogQuery;

/// All five queries with their default parameters, in report order.
pub fn standard_queries() -> Vec<Box<dyn CatalogQuery>> {
    vec![
        Box::new(AliveActorsByPrefix::default()),
        Box::new(ProlificProducers::default()),
        Box::new(WriterAverageRuntime::default()),
        Box::new(LongMovieProducers::default()),
        Box::new(DirectorActorGenre::default()),
    ]
}

/// `$lookup` resolving member ids in `local_field` against `Members._id`.
pub(crate) fn lookup_members(local_field: &str, as_field: &str) -> Document {
    doc! {
        "$lookup": {
            "from": MEMBERS,
            "localField": local_field,
            "foreignField": "_id",
            "as": as_field,
        }
    }
}

pub(crate) fn unwind(field: &str) -> Document {
    doc! { "$unwind": format!("${}", field) }
}

/// Case-insensitive "starts with" predicate; `prefix` is matched literally.
pub(crate) fn starts_with(prefix: &str) -> Document {
    doc! { "$regex": format!("^{}", regex::escape(prefix)), "$options": "i" }
}

/// Case-insensitive "contains" predicate; `fragment` is matched literally.
pub(crate) fn contains(fragment: &str) -> Document {
    doc! { "$regex": regex::escape(fragment), "$options": "i" }
}

/// Predicate for a living (or unknown) member: no `deathyear` field.
pub(crate) fn alive(member_field: &str) -> Document {
    let mut predicate = Document::new();
    predicate.insert(format!("{}.deathyear", member_field), doc! { "$exists": false });
    predicate
}

/// `$group` by `key` counting rows, followed by a strict `count > min` filter.
pub(crate) fn count_above(key: &str, min_count: i64) -> [Document; 2] {
    [
        doc! { "$group": { "_id": key, "count": { "$sum": 1 } } },
        doc! { "$match": { "count": { "$gt": min_count } } },
    ]
}
