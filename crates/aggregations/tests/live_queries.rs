//! Queries against a live MongoDB.
//!
//! Ignored by default; run with
//!
//! ```text
//! REEL_TEST_MONGO_URI=mongodb://localhost:27017 \
//!     cargo test --package aggregations -- --ignored
//! ```
//!
//! Each test works in its own scratch database and drops it afterwards.

use aggregations::queries::{
    AliveActorsByPrefix, DirectorActorGenre, LongMovieProducers, ProlificProducers,
    WriterAverageRuntime,
};
use aggregations::{IndexBuilder, QueryRunner, standard_queries};
use anyhow::{Context, Result};
use catalog::{ActorRoles, MEMBERS, MOVIES, MemberDocument, MovieDocument};
use mongodb::{Client, Database};

async fn scratch_database(label: &str) -> Result<Database> {
    let uri = std::env::var("REEL_TEST_MONGO_URI").context("REEL_TEST_MONGO_URI not set")?;
    let client = Client::with_uri_str(&uri).await?;
    let name = format!("reel_test_{}_{}", label, std::process::id());
    let database = client.database(&name);
    database.drop(None).await?;
    Ok(database)
}

fn member(id: i64, name: &str) -> MemberDocument {
    MemberDocument {
        id,
        name: name.to_string(),
        birthyear: None,
        deathyear: None,
    }
}

fn dead_member(id: i64, name: &str, deathyear: i32) -> MemberDocument {
    MemberDocument {
        deathyear: Some(deathyear),
        ..member(id, name)
    }
}

fn cast(actor: i64, role: &str) -> ActorRoles {
    ActorRoles {
        actor,
        roles: vec![role.to_string()],
    }
}

async fn insert_members(database: &Database, members: Vec<MemberDocument>) -> Result<()> {
    database
        .collection::<MemberDocument>(MEMBERS)
        .insert_many(members, None)
        .await?;
    Ok(())
}

async fn insert_movies(database: &Database, movies: Vec<MovieDocument>) -> Result<()> {
    database
        .collection::<MovieDocument>(MOVIES)
        .insert_many(movies, None)
        .await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_alive_actors_skip_dead_and_excluded_year() -> Result<()> {
    let database = scratch_database("q1").await?;

    insert_members(
        &database,
        vec![
            member(1, "phillip Living"),
            dead_member(2, "Philip Gone", 2014),
            member(3, "Philippa Stone"),
            member(4, "Sophie Phillips"),
        ],
    )
    .await?;

    insert_movies(
        &database,
        vec![
            MovieDocument {
                id: 100,
                startyear: Some(2015),
                actors: Some(vec![cast(1, "Lead"), cast(2, "Cop"), cast(4, "Nurse")]),
                ..Default::default()
            },
            MovieDocument {
                id: 101,
                startyear: Some(2014),
                actors: Some(vec![cast(3, "Lead")]),
                ..Default::default()
            },
        ],
    )
    .await?;

    let report = QueryRunner::new(database.clone())
        .run(&AliveActorsByPrefix::default())
        .await?;

    assert_eq!(report.rows.len(), 1);
    let matched = report.rows[0].get_array("member_actors")?;
    assert_eq!(matched.len(), 1);
    let actor = matched[0].as_document().context("member entry")?;
    assert_eq!(actor.get_i64("_id")?, 1);
    assert_eq!(actor.len(), 1);

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_writer_average_runtime_for_living_writer() -> Result<()> {
    let database = scratch_database("q3").await?;

    insert_members(
        &database,
        vec![
            member(1, "Vishal Bhardwaj"),
            dead_member(2, "Old Bhardwaj", 1990),
            member(3, "Someone Else"),
        ],
    )
    .await?;

    let movie = |id: i64, runtime: i32, writers: Vec<i64>| MovieDocument {
        id,
        runtime: Some(runtime),
        writers: Some(writers),
        ..Default::default()
    };
    insert_movies(
        &database,
        vec![
            movie(1, 100, vec![1]),
            movie(2, 150, vec![1, 2]),
            movie(3, 300, vec![2]),
            movie(4, 60, vec![3]),
        ],
    )
    .await?;

    let report = QueryRunner::new(database.clone())
        .run(&WriterAverageRuntime::default())
        .await?;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].get_f64("avgruntime")?, 125.0);
    assert!(!report.rows[0].contains_key("_id"));

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_long_movie_thresholds_are_strict() -> Result<()> {
    let database = scratch_database("q4").await?;

    insert_members(
        &database,
        vec![
            member(1, "Thirty One"),
            member(2, "Thirty"),
            member(3, "Thirty Plus Exactly 120"),
            dead_member(4, "Dead Prolific", 2001),
        ],
    )
    .await?;

    // (producer, runtime, how many movies)
    let plan = [(1, 121, 31), (2, 121, 30), (3, 121, 30), (3, 120, 1), (4, 200, 40)];
    let mut movies = Vec::new();
    for (producer, runtime, count) in plan {
        for _ in 0..count {
            movies.push(MovieDocument {
                id: movies.len() as i64,
                runtime: Some(runtime),
                producers: Some(vec![producer]),
                ..Default::default()
            });
        }
    }
    insert_movies(&database, movies).await?;

    let report = QueryRunner::new(database.clone())
        .run(&LongMovieProducers::default())
        .await?;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].get_i64("_id")?, 1);
    assert_eq!(report.rows[0].len(), 1);

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_run_all_reports_every_query_in_order() -> Result<()> {
    let database = scratch_database("all").await?;
    insert_members(&database, vec![member(1, "James Cameron")]).await?;

    let reports = QueryRunner::new(database.clone())
        .run_all(&standard_queries())
        .await?;

    let names: Vec<&str> = reports.iter().map(|report| report.name.as_str()).collect();
    assert_eq!(names, vec!["2.1", "2.2", "2.3", "2.4", "2.5"]);
    assert!(reports.iter().all(|report| report.rows.is_empty()));

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_director_actor_genre_returns_only_matching_movie() -> Result<()> {
    let database = scratch_database("q5").await?;

    insert_members(
        &database,
        vec![
            member(1, "James Cameron"),
            member(2, "Sigourney Weaver"),
            member(3, "Somebody Else"),
        ],
    )
    .await?;

    insert_movies(
        &database,
        vec![
            MovieDocument {
                id: 100,
                title: Some("Aliens".to_string()),
                genres: Some(vec!["Action".to_string(), "Sci-Fi".to_string()]),
                directors: Some(vec![1]),
                actors: Some(vec![cast(2, "Ripley"), cast(3, "Hudson")]),
                ..Default::default()
            },
            MovieDocument {
                id: 200,
                title: Some("Unrelated".to_string()),
                genres: Some(vec!["Drama".to_string()]),
                directors: Some(vec![3]),
                actors: Some(vec![cast(3, "Lead")]),
                ..Default::default()
            },
        ],
    )
    .await?;

    let report = QueryRunner::new(database.clone())
        .run(&DirectorActorGenre::default())
        .await?;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].get_i64("_id")?, 100);
    assert_eq!(report.rows[0].get_str("title")?, "Aliens");
    assert_eq!(report.rows[0].len(), 2);

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_producer_count_threshold_is_strict() -> Result<()> {
    let database = scratch_database("q2").await?;

    // Producer 1 has exactly 50 qualifying movies, producer 2 has 51.
    insert_members(&database, vec![member(1, "Ann Gill"), member(2, "GILLIAN Moss")]).await?;

    let movies: Vec<MovieDocument> = (0..101)
        .map(|i| MovieDocument {
            id: i,
            startyear: Some(2017),
            genres: Some(vec!["Talk-Show".to_string()]),
            producers: Some(vec![if i < 50 { 1 } else { 2 }]),
            ..Default::default()
        })
        .collect();
    insert_movies(&database, movies).await?;

    let report = QueryRunner::new(database.clone())
        .run(&ProlificProducers::default())
        .await?;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].get_i64("_id")?, 2);
    assert_eq!(report.rows[0].get_i32("count")?, 51);

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_indexes_do_not_change_results() -> Result<()> {
    let database = scratch_database("idx").await?;

    insert_members(
        &database,
        vec![member(1, "James Cameron"), member(2, "Sigourney Weaver")],
    )
    .await?;
    insert_movies(
        &database,
        vec![MovieDocument {
            id: 7,
            title: Some("Aliens".to_string()),
            genres: Some(vec!["Sci-Fi".to_string()]),
            directors: Some(vec![1]),
            actors: Some(vec![cast(2, "Ripley")]),
            ..Default::default()
        }],
    )
    .await?;

    let runner = QueryRunner::new(database.clone());
    let before = runner.run(&DirectorActorGenre::default()).await?;

    let builder = IndexBuilder::new(database.clone());
    let names = builder.create_all().await?;
    assert_eq!(names.len(), 4);
    assert!(names.contains(&"search_index".to_string()));
    // Identical definitions are accepted again.
    builder.create_all().await?;

    let after = runner.run(&DirectorActorGenre::default()).await?;
    assert_eq!(before.rows, after.rows);

    database.drop(None).await?;
    Ok(())
}
