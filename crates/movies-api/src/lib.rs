//! HTTP surface of the Movies service.
//!
//! Handlers translate requests into [`MoviesStore`](movies_core::MoviesStore)
//! calls and map the store's results onto status codes; see [`error`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
