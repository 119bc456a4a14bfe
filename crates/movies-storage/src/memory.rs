use crate::error::Result;
use async_trait::async_trait;
use movies_core::{
    Clock, CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    SystemClock, UpdateMovieParams,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of [`MoviesStore`].
///
/// All movies live in one `HashMap` behind a single store-wide `RwLock`.
/// Reads share the lock; every write holds it exclusively for the whole
/// operation, so a presence check and the mutation that depends on it can
/// never interleave with another writer. The only point where a call can
/// suspend is while waiting for the lock.
#[derive(Debug)]
pub struct InMemoryMoviesStore<C = SystemClock> {
    movies: RwLock<HashMap<MovieId, Movie>>,
    clock: C,
}

impl InMemoryMoviesStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryMoviesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryMoviesStore<C> {
    /// Creates an empty store that takes its timestamps from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            movies: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[cfg(test)]
impl<C: Clock> InMemoryMoviesStore<C> {
    async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

#[async_trait]
impl<C: Clock> ReadMoviesStore for InMemoryMoviesStore<C> {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
        let movies = self.movies.read().await;
        movies.get(id).cloned().ok_or(StoreError::NotFound(*id))
    }
}

#[async_trait]
impl<C: Clock> MoviesStore for InMemoryMoviesStore<C> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        let mut movies = self.movies.write().await;

        if movies.contains_key(&params.id) {
            return Err(StoreError::DuplicateKey(params.id));
        }

        let movie = params.into_movie(self.clock.now());
        movies.insert(movie.id, movie);
        Ok(())
    }

    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()> {
        let mut movies = self.movies.write().await;

        let Some(movie) = movies.get_mut(id) else {
            return Err(StoreError::NotFound(*id));
        };

        movie.apply(params, self.clock.now());
        Ok(())
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        self.movies.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use movies_core::ManualClock;
    use movies_test_infra::contract;
    use std::sync::Arc;

    fn params(id: MovieId, title: &str) -> CreateMovieParams {
        CreateMovieParams {
            id,
            title: title.to_string(),
            director: "Christopher Nolan".to_string(),
            release_date: "2010-07-16T00:00:00Z".parse().unwrap(),
            ticket_price: 12.50,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        contract::create_then_get(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn create_duplicate_fails() {
        contract::create_duplicate_fails(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        contract::get_missing_is_not_found(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn update_changes_mutable_fields() {
        contract::update_changes_mutable_fields(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        contract::update_missing_is_not_found(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn delete_removes() {
        contract::delete_removes(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn delete_missing_succeeds() {
        contract::delete_missing_succeeds(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn get_all_empty() {
        contract::get_all_empty(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn get_all_returns_inserted() {
        contract::get_all_returns_inserted(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn inception_scenario() {
        contract::inception_scenario(&InMemoryMoviesStore::new()).await;
    }

    #[tokio::test]
    async fn timestamps_follow_clock() {
        let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
        let store = InMemoryMoviesStore::with_clock(clock.clone());
        contract::timestamps_follow_clock(&store, &clock).await;
    }

    #[tokio::test]
    async fn callers_receive_copies() {
        let store = InMemoryMoviesStore::new();
        let id = MovieId::new_v4();
        store.create(params(id, "Dunkirk")).await.unwrap();

        let mut copy = store.get_by_id(&id).await.unwrap();
        copy.title = "Changed locally".to_string();

        assert_eq!(store.get_by_id(&id).await.unwrap().title, "Dunkirk");
    }

    #[tokio::test]
    async fn len_tracks_creates_and_deletes() {
        let store = InMemoryMoviesStore::new();
        assert!(store.is_empty().await);

        let id = MovieId::new_v4();
        store.create(params(id, "Interstellar")).await.unwrap();
        assert_eq!(store.len().await, 1);

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_creates_of_distinct_ids() {
        let store = Arc::new(InMemoryMoviesStore::new());
        let mut handles = vec![];

        for i in 0..32u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let id = MovieId::new_v4();
                store
                    .create(params(id, &format!("movie-{i:02}")))
                    .await
                    .unwrap();
                id
            }));
        }

        // readers racing the writers must never fail
        for _ in 0..32 {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.get_all().await.unwrap();
            });
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let mut stored: Vec<MovieId> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        stored.sort();
        ids.sort();
        assert_eq!(stored, ids);
    }

    #[tokio::test]
    async fn concurrent_duplicate_creates_have_one_winner() {
        let store = Arc::new(InMemoryMoviesStore::new());
        let id = MovieId::new_v4();
        let mut handles = vec![];

        for i in 0..16u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(params(id, &format!("attempt-{i}"))).await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(StoreError::DuplicateKey(dup)) => {
                    assert_eq!(dup, id);
                    duplicates += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_updates_are_serialized() {
        let store = Arc::new(InMemoryMoviesStore::new());
        let id = MovieId::new_v4();
        store.create(params(id, "The Prestige")).await.unwrap();
        let mut handles = vec![];

        for i in 0..16u32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update(
                        &id,
                        UpdateMovieParams {
                            title: format!("The Prestige #{i}"),
                            director: format!("director-{i}"),
                            release_date: "2006-10-20T00:00:00Z".parse().unwrap(),
                            ticket_price: f64::from(i),
                        },
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // last writer wins, but every field comes from the same writer
        let movie = store.get_by_id(&id).await.unwrap();
        let suffix = movie.title.trim_start_matches("The Prestige #");
        assert_eq!(movie.director, format!("director-{suffix}"));
        assert_eq!(movie.ticket_price.to_string(), suffix);
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let store: Arc<dyn MoviesStore> = Arc::new(InMemoryMoviesStore::new());
        contract::create_then_get(&store).await;
    }
}
