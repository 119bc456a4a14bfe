mod health;
mod movie;

pub use health::HealthResponse;
pub use movie::{CreateMovieRequest, ErrorResponse, MovieResponse, UpdateMovieRequest};
