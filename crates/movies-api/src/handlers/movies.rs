use crate::error::Result;
use crate::model::{CreateMovieRequest, MovieResponse, UpdateMovieRequest};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use movies_core::{CreateMovieParams, MovieId};
use tracing::debug;

pub async fn list_movies_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>> {
    let movies = state.store().get_all().await?;
    debug!(count = movies.len(), "listed movies");

    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

pub async fn get_movie_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MovieResponse>> {
    let id: MovieId = id.parse()?;
    let movie = state.store().get_by_id(&id).await?;

    Ok(Json(movie.into()))
}

pub async fn create_movie_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateMovieRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(request) = request?;
    let params = CreateMovieParams::try_from(request)?;
    let id = params.id;

    state.store().create(params).await?;
    debug!(movie_id = %id, "created movie");

    Ok(StatusCode::OK)
}

pub async fn update_movie_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    request: std::result::Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let id: MovieId = id.parse()?;
    let Json(request) = request?;

    state.store().update(&id, request.into()).await?;
    debug!(movie_id = %id, "updated movie");

    Ok(StatusCode::OK)
}

pub async fn delete_movie_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let id: MovieId = id.parse()?;

    state.store().delete(&id).await?;
    debug!(movie_id = %id, "deleted movie");

    Ok(StatusCode::OK)
}
