//! Benchmarks for the transform step
//!
//! Run with: cargo bench --package catalog
//!
//! Uses a synthetic catalog sized roughly like one page of IMDB titles.

use catalog::{ActorRoleRow, CatalogDocument, MovieDocument, MovieRow, group_actor_roles};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const MOVIES: i64 = 2_000;
const ACTORS_PER_MOVIE: i64 = 8;

fn synthetic_movies() -> Vec<MovieRow> {
    (0..MOVIES)
        .map(|id| MovieRow {
            id,
            kind: Some("movie".to_string()),
            title: Some(format!("Title {}", id)),
            originaltitle: None,
            startyear: Some(1990 + (id % 30) as i32),
            endyear: None,
            runtime: Some(80 + (id % 90) as i32),
            avgrating: Some(6.5),
            numvotes: Some(1_000 + id),
            genres: Some(vec!["Drama".to_string(), "Sci-Fi".to_string()]),
            directors: Some(vec![id % 97]),
            writers: Some(vec![id % 89, id % 83]),
            producers: Some(vec![id % 79, id % 79, id % 73]),
        })
        .collect()
}

fn synthetic_roles() -> Vec<ActorRoleRow> {
    (0..MOVIES)
        .flat_map(|movie| {
            (0..ACTORS_PER_MOVIE).map(move |actor| ActorRoleRow {
                movie,
                actor: movie * 10 + actor,
                roles: Some(vec![format!("Role {}", actor), "Self".to_string()]),
            })
        })
        .collect()
}

fn bench_group_actor_roles(c: &mut Criterion) {
    let rows = synthetic_roles();

    c.bench_function("group_actor_roles", |b| {
        b.iter(|| black_box(group_actor_roles(black_box(rows.clone()))))
    });
}

fn bench_shape_movies(c: &mut Criterion) {
    let movies = synthetic_movies();
    let roles = synthetic_roles();

    c.bench_function("shape_and_encode_movies", |b| {
        b.iter(|| {
            let mut actors = group_actor_roles(roles.clone());
            for row in movies.iter().cloned() {
                let cast = actors.remove(&row.id).unwrap_or_default();
                let document = MovieDocument::from_row(row, cast).to_document().unwrap();
                black_box(document);
            }
        })
    });
}

criterion_group!(benches, bench_group_actor_roles, bench_shape_movies);
criterion_main!(benches);
