//! Core types and traits for the Movies service.
//!
//! This crate provides the `Movie` record, the store contract every
//! persistence backend implements, and the error taxonomy shared by the
//! storage backends and the HTTP layer.

pub mod clock;
pub mod error;
pub mod movie;
pub mod movie_id;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StoreError};
pub use movie::{CreateMovieParams, Movie, UpdateMovieParams};
pub use movie_id::MovieId;
pub use store::{MoviesStore, ReadMoviesStore};
