use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{parse_movie_id, AppError},
    fetch::{FetchController, FetchState},
    pages,
    tmdb::{Movie, MovieDetail},
    AppState,
};

/// JSON mirror of the HTML pages: each endpoint answers with the settled
/// `FetchState` the matching page would render.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/movies/popular", get(get_popular_movies))
        .route("/search", get(search))
        .route("/movie/:id", get(get_movie_detail))
        .with_state(state)
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

async fn get_popular_movies(State(state): State<AppState>) -> Json<FetchState<Vec<Movie>>> {
    let controller = FetchController::new();
    Json(pages::popular(&controller, state.tmdb.as_ref()).await)
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<FetchState<Vec<Movie>>> {
    let controller = FetchController::new();
    Json(pages::search(&controller, state.tmdb.as_ref(), params.query.as_deref()).await)
}

async fn get_movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FetchState<MovieDetail>>, AppError> {
    let id = parse_movie_id(&id)?;
    let controller = FetchController::new();
    Ok(Json(pages::detail(&controller, state.tmdb.as_ref(), id).await))
}
