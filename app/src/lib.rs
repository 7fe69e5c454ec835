use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pages;
pub mod routes;
pub mod templates;
pub mod tmdb;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn tmdb::TmdbApi>,
}
