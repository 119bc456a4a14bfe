//! Behavioural checks shared by every store backend.
//!
//! Each check panics on failure, so a backend's test module only has to
//! call it with a store. Checks that count records expect an empty store.

use jiff::{SignedDuration, Timestamp};
use movies_core::{
    CreateMovieParams, ManualClock, Movie, MovieId, MoviesStore, StoreError, UpdateMovieParams,
};
use std::collections::HashSet;

/// Allowed distance between a store-stamped timestamp and the test's clock.
pub const TIMESTAMP_TOLERANCE: SignedDuration = SignedDuration::from_secs(1);

pub const INCEPTION_ID: &str = "11111111-1111-1111-1111-111111111111";

pub fn inception() -> CreateMovieParams {
    CreateMovieParams {
        id: MovieId::parse(INCEPTION_ID).expect("valid id"),
        title: "Inception".to_string(),
        director: "Christopher Nolan".to_string(),
        release_date: "2010-07-16T00:00:00Z".parse().expect("valid timestamp"),
        ticket_price: 12.50,
    }
}

/// Fresh create params with a random id.
pub fn sample_params(title: &str) -> CreateMovieParams {
    CreateMovieParams {
        id: MovieId::new_v4(),
        title: title.to_string(),
        director: "Test Director".to_string(),
        release_date: "2021-03-04T05:06:07Z".parse().expect("valid timestamp"),
        ticket_price: 9.75,
    }
}

pub fn sample_update(title: &str) -> UpdateMovieParams {
    UpdateMovieParams {
        title: title.to_string(),
        director: "Another Director".to_string(),
        release_date: "2022-08-09T10:11:12Z".parse().expect("valid timestamp"),
        ticket_price: 14.25,
    }
}

pub fn assert_close_to_now(ts: Timestamp) {
    let drift = Timestamp::now().duration_since(ts).abs();
    assert!(
        drift <= TIMESTAMP_TOLERANCE,
        "timestamp {ts} is {drift:?} away from now"
    );
}

fn assert_matches_params(movie: &Movie, params: &CreateMovieParams) {
    assert_eq!(movie.id, params.id);
    assert_eq!(movie.title, params.title);
    assert_eq!(movie.director, params.director);
    assert_eq!(movie.release_date, params.release_date);
    assert_eq!(movie.ticket_price, params.ticket_price);
}

pub async fn create_then_get<S: MoviesStore + ?Sized>(store: &S) {
    let params = sample_params("Create Then Get");

    store.create(params.clone()).await.expect("create");
    let movie = store.get_by_id(&params.id).await.expect("get_by_id");

    assert_matches_params(&movie, &params);
    assert_eq!(movie.created_at, movie.updated_at);
    assert_close_to_now(movie.created_at);
}

pub async fn create_duplicate_fails<S: MoviesStore + ?Sized>(store: &S) {
    let original = sample_params("Original");
    store.create(original.clone()).await.expect("create");
    let before = store.get_by_id(&original.id).await.expect("get_by_id");

    let mut duplicate = sample_params("Duplicate");
    duplicate.id = original.id;
    let err = store.create(duplicate).await.unwrap_err();

    assert_eq!(err, StoreError::DuplicateKey(original.id));
    let after = store.get_by_id(&original.id).await.expect("get_by_id");
    assert_eq!(after, before);
}

pub async fn get_missing_is_not_found<S: MoviesStore + ?Sized>(store: &S) {
    let id = MovieId::new_v4();
    let err = store.get_by_id(&id).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound(id));
}

pub async fn update_changes_mutable_fields<S: MoviesStore + ?Sized>(store: &S) {
    let params = sample_params("Before Update");
    store.create(params.clone()).await.expect("create");
    let before = store.get_by_id(&params.id).await.expect("get_by_id");

    let update = sample_update("After Update");
    store
        .update(&params.id, update.clone())
        .await
        .expect("update");
    let after = store.get_by_id(&params.id).await.expect("get_by_id");

    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.title, update.title);
    assert_eq!(after.director, update.director);
    assert_eq!(after.release_date, update.release_date);
    assert_eq!(after.ticket_price, update.ticket_price);
    assert!(after.updated_at >= before.updated_at);
    assert_close_to_now(after.updated_at);
}

pub async fn update_missing_is_not_found<S: MoviesStore + ?Sized>(store: &S) {
    let id = MovieId::new_v4();
    let err = store
        .update(&id, sample_update("Nobody"))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound(id));
    assert_eq!(
        store.get_by_id(&id).await.unwrap_err(),
        StoreError::NotFound(id)
    );
}

pub async fn delete_removes<S: MoviesStore + ?Sized>(store: &S) {
    let params = sample_params("Doomed");
    store.create(params.clone()).await.expect("create");

    store.delete(&params.id).await.expect("delete");

    assert_eq!(
        store.get_by_id(&params.id).await.unwrap_err(),
        StoreError::NotFound(params.id)
    );
}

pub async fn delete_missing_succeeds<S: MoviesStore + ?Sized>(store: &S) {
    store
        .delete(&MovieId::new_v4())
        .await
        .expect("deleting a missing id succeeds");
}

pub async fn get_all_empty<S: MoviesStore + ?Sized>(store: &S) {
    let movies = store.get_all().await.expect("get_all");
    assert!(movies.is_empty(), "expected no movies, got {movies:?}");
}

pub async fn get_all_returns_inserted<S: MoviesStore + ?Sized>(store: &S) {
    let mut expected = HashSet::new();
    for i in 0..5 {
        let params = sample_params(&format!("Listed {i}"));
        expected.insert(params.id);
        store.create(params).await.expect("create");
    }

    let movies = store.get_all().await.expect("get_all");
    let ids: HashSet<MovieId> = movies.iter().map(|m| m.id).collect();

    assert_eq!(movies.len(), expected.len());
    assert_eq!(ids, expected);
}

/// Create, duplicate create, update, delete of the Inception record.
pub async fn inception_scenario<S: MoviesStore + ?Sized>(store: &S) {
    let params = inception();
    let id = params.id;

    store.create(params.clone()).await.expect("create");
    let created = store.get_by_id(&id).await.expect("get_by_id");
    assert_matches_params(&created, &params);

    assert_eq!(
        store.create(params).await.unwrap_err(),
        StoreError::DuplicateKey(id)
    );

    store
        .update(
            &id,
            UpdateMovieParams {
                title: "Inception (2010)".to_string(),
                director: "Christopher Nolan".to_string(),
                release_date: "2010-07-16T00:00:00Z".parse().expect("valid timestamp"),
                ticket_price: 13.00,
            },
        )
        .await
        .expect("update");
    let updated = store.get_by_id(&id).await.expect("get_by_id");
    assert_eq!(updated.title, "Inception (2010)");
    assert_eq!(updated.ticket_price, 13.00);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    store.delete(&id).await.expect("delete");
    assert_eq!(
        store.get_by_id(&id).await.unwrap_err(),
        StoreError::NotFound(id)
    );
}

/// Timestamp ownership for a store that reads `clock`.
///
/// `created_at` and `updated_at` come from the clock, and `updated_at` holds
/// its value when the clock is stepped backwards.
pub async fn timestamps_follow_clock<S: MoviesStore + ?Sized>(store: &S, clock: &ManualClock) {
    let start = Timestamp::from_second(1_700_000_000).expect("valid timestamp");
    let later = start + SignedDuration::from_secs(30);
    clock.set(start);

    let params = sample_params("Clocked");
    store.create(params.clone()).await.expect("create");
    let created = store.get_by_id(&params.id).await.expect("get_by_id");
    assert_eq!(created.created_at, start);
    assert_eq!(created.updated_at, start);

    clock.set(later);
    store
        .update(&params.id, sample_update("Clocked Later"))
        .await
        .expect("update");
    let updated = store.get_by_id(&params.id).await.expect("get_by_id");
    assert_eq!(updated.created_at, start);
    assert_eq!(updated.updated_at, later);

    clock.set(start - SignedDuration::from_hours(1));
    store
        .update(&params.id, sample_update("Clock Went Back"))
        .await
        .expect("update");
    let rewound = store.get_by_id(&params.id).await.expect("get_by_id");
    assert_eq!(rewound.title, "Clock Went Back");
    assert_eq!(rewound.created_at, start);
    assert_eq!(rewound.updated_at, later);
}
