use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_movie_handler, delete_movie_handler, get_movie_handler, health_handler,
    list_movies_handler, update_movie_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/movies", get(list_movies_handler).post(create_movie_handler))
            .route(
                "/movies/{id}",
                get(get_movie_handler)
                    .put(update_movie_handler)
                    .delete(delete_movie_handler),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
