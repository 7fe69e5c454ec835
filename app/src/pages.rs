//! Page loaders: what each page asks the API for, and how the answers are
//! folded into its [`FetchController`].

use crate::fetch::{FetchController, FetchState};
use crate::tmdb::{Movie, MovieDetail, NetworkError, TmdbApi};

pub const POPULAR_FAILED: &str = "Failed to fetch popular movies. Please try again later.";
pub const DETAIL_FAILED: &str =
    "Failed to fetch movie details. It might not exist or there was an API error.";

pub fn search_failed(query: &str) -> String {
    format!("Failed to search for \"{}\". Please try again later.", query)
}

pub async fn load_popular(api: &dyn TmdbApi) -> Result<Vec<Movie>, NetworkError> {
    Ok(api.popular_movies(1).await?.results)
}

pub async fn load_search(api: &dyn TmdbApi, query: &str) -> Result<Vec<Movie>, NetworkError> {
    Ok(api.search_movies(query, 1).await?.results)
}

/// Primary, credits and videos run concurrently. The first failure wins and
/// the remaining calls are not awaited.
pub async fn load_detail(api: &dyn TmdbApi, id: i64) -> Result<MovieDetail, NetworkError> {
    let (mut detail, credits, videos) =
        tokio::try_join!(api.movie(id), api.movie_credits(id), api.movie_videos(id))?;

    detail.credits = Some(credits);
    detail.videos = Some(videos);
    Ok(detail)
}

pub async fn popular(
    controller: &FetchController<Vec<Movie>>,
    api: &dyn TmdbApi,
) -> FetchState<Vec<Movie>> {
    controller.navigate(POPULAR_FAILED, load_popular(api)).await
}

/// A blank or missing query settles as an empty result without touching
/// the network.
pub async fn search(
    controller: &FetchController<Vec<Movie>>,
    api: &dyn TmdbApi,
    query: Option<&str>,
) -> FetchState<Vec<Movie>> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => {
            controller
                .navigate(&search_failed(query), load_search(api, query))
                .await
        }
        None => {
            let ticket = controller.begin();
            controller.settle(ticket, Vec::new());
            controller.state()
        }
    }
}

pub async fn detail(
    controller: &FetchController<MovieDetail>,
    api: &dyn TmdbApi,
    id: i64,
) -> FetchState<MovieDetail> {
    controller.navigate(DETAIL_FAILED, load_detail(api, id)).await
}
