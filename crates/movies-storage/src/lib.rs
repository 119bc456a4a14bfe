//! Persistence backends for the Movies service.
//!
//! Every backend implements [`MoviesStore`]. [`InMemoryMoviesStore`] is the
//! reference implementation; the SQL backends reproduce its behaviour over a
//! pooled `sqlx` connection and [`MongoMoviesStore`] over a MongoDB
//! collection. [`TimeoutStore`] bounds the runtime of any of them.

pub mod error;
pub mod memory;
pub mod mongo;
pub mod mysql;
pub mod pool;
pub mod postgres;
pub mod timeout;

mod timestamp;

pub use memory::InMemoryMoviesStore;
pub use mongo::MongoMoviesStore;
pub use movies_core::{
    CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    UpdateMovieParams,
};
pub use mysql::MySqlMoviesStore;
pub use pool::PoolConfig;
pub use postgres::PostgresMoviesStore;
pub use timeout::TimeoutStore;
