use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    api::{self, SearchQuery},
    error::parse_movie_id,
    fetch::FetchController,
    pages, templates, AppState,
};

pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/search", get(search_page))
        .route("/movie/:id", get(movie_detail_page))
        .nest("/api", api::routes(state.clone()))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_page(State(state): State<AppState>) -> Html<String> {
    let controller = FetchController::new();
    let settled = pages::popular(&controller, state.tmdb.as_ref()).await;
    Html(templates::render_popular(&settled))
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Html<String> {
    let query = params.query.unwrap_or_default();
    let controller = FetchController::new();
    let settled = pages::search(&controller, state.tmdb.as_ref(), Some(query.as_str())).await;
    Html(templates::render_search(query.trim(), &settled))
}

async fn movie_detail_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = parse_movie_id(&id) else {
        return not_found_page().await.into_response();
    };

    let controller = FetchController::new();
    let settled = pages::detail(&controller, state.tmdb.as_ref(), id).await;
    Html(templates::render_movie_detail(&settled)).into_response()
}

async fn not_found_page() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(templates::render_not_found()))
}
