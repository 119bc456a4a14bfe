use crate::error::Result;
use crate::movie::{CreateMovieParams, Movie, UpdateMovieParams};
use crate::movie_id::MovieId;
use async_trait::async_trait;
use std::sync::Arc;

/// The read half of a movie store.
///
/// Both operations are safe to run concurrently with each other and with
/// writes. Cancelling a call is done by dropping its future.
#[async_trait]
pub trait ReadMoviesStore: Send + Sync + 'static {
    /// Returns every stored movie in no particular order.
    /// An empty store yields an empty vector, not an error.
    async fn get_all(&self) -> Result<Vec<Movie>>;

    /// Returns the movie with the given id, or `Err(NotFound)`.
    async fn get_by_id(&self, id: &MovieId) -> Result<Movie>;
}

/// The full movie store contract.
///
/// Implementations own the persisted representation and stamp
/// `created_at`/`updated_at` themselves; callers only ever receive copies.
#[async_trait]
pub trait MoviesStore: ReadMoviesStore {
    /// Inserts a new movie. Returns `Err(DuplicateKey)` if the id is taken.
    async fn create(&self, params: CreateMovieParams) -> Result<()>;

    /// Replaces the mutable fields of an existing movie.
    /// Returns `Err(NotFound)` if the id does not exist.
    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()>;

    /// Removes the movie with the given id.
    /// Deleting an id that does not exist succeeds.
    async fn delete(&self, id: &MovieId) -> Result<()>;
}

#[async_trait]
impl<S: ReadMoviesStore + ?Sized> ReadMoviesStore for Arc<S> {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
        (**self).get_by_id(id).await
    }
}

#[async_trait]
impl<S: MoviesStore + ?Sized> MoviesStore for Arc<S> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        (**self).create(params).await
    }

    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()> {
        (**self).update(id, params).await
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        (**self).delete(id).await
    }
}
