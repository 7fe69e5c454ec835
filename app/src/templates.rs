use askama_escape::{escape as escape_html, Html};
use chrono::{Datelike, NaiveDate};

use crate::fetch::FetchState;
use crate::tmdb::{CastMember, Movie, MovieDetail};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const PLACEHOLDER: &str = "/static/placeholder.svg";
const TOP_CAST: usize = 8;

pub fn render_popular(state: &FetchState<Vec<Movie>>) -> String {
    let mut html = String::new();
    html.push_str(&base_start("Reelscope"));

    match state {
        FetchState::Idle | FetchState::Loading => html.push_str(&loading("Loading movies...")),
        FetchState::Error(message) => html.push_str(&error_panel(message)),
        FetchState::Ready(movies) => {
            html.push_str(r#"<div class="list-page"><h1>Discover Popular Movies</h1>"#);
            html.push_str(&movie_grid(movies, "No popular movies found."));
            html.push_str("</div>");
        }
    }

    html.push_str(&base_end());
    html
}

pub fn render_search(query: &str, state: &FetchState<Vec<Movie>>) -> String {
    let query = escape(query);
    let mut html = String::new();
    html.push_str(&base_start("Search - Reelscope"));

    match state {
        FetchState::Idle | FetchState::Loading => {
            html.push_str(&loading(&format!("Searching for \"{}\"...", query)))
        }
        FetchState::Error(message) => html.push_str(&error_panel(message)),
        FetchState::Ready(movies) => {
            html.push_str(&format!(
                r#"<div class="list-page"><h1>Results for "{}"</h1>"#,
                query
            ));
            html.push_str(&movie_grid(
                movies,
                &format!("No movies found for \"{}\".", query),
            ));
            html.push_str("</div>");
        }
    }

    html.push_str(&base_end());
    html
}

pub fn render_movie_detail(state: &FetchState<MovieDetail>) -> String {
    let movie = match state {
        FetchState::Ready(movie) => movie,
        FetchState::Idle | FetchState::Loading => {
            return page("Reelscope", &loading("Loading movie details..."))
        }
        FetchState::Error(message) => return page("Reelscope", &error_panel(message)),
    };

    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - Reelscope", movie.movie.title)));

    let title = escape(&movie.movie.title);
    let backdrop = movie
        .movie
        .backdrop_path
        .as_deref()
        .filter(|p| is_image_path(p))
        .map(|p| format!("'{}/original{}'", IMAGE_BASE, escape(p)))
        .unwrap_or_default();
    let poster = image_url(movie.movie.poster_path.as_deref(), "w500");
    let tagline = movie
        .tagline
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#"<p class="tagline">{}</p>"#, escape(t)))
        .unwrap_or_default();
    let runtime = movie
        .runtime
        .map(|r| format!(r#"<span class="runtime">⏱ {} min</span>"#, r))
        .unwrap_or_default();
    let genres = if movie.genres.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="genres">Genres: {}</span>"#,
            escape(&movie.genre_names())
        )
    };

    html.push_str(&format!(
        r#"<div class="detail-page"><div class="detail-hero" style="background-image: linear-gradient(rgba(0,0,0,0.3), rgba(17,24,39,1)), url({});"><div class="detail-content"><img class="detail-poster" src="{}" alt="{}"><div class="detail-info"><h1>{}</h1>{}<div class="meta"><span class="rating">⭐ {} / 10</span><span class="release">📅 {}</span>{}{}</div></div></div></div>"#,
        backdrop,
        poster,
        title,
        title,
        tagline,
        rating(movie.movie.vote_average),
        escape(&movie.movie.release_date),
        runtime,
        genres
    ));

    html.push_str(&format!(
        r#"<section class="overview-section"><h2>Overview</h2><p class="overview">{}</p></section>"#,
        escape(&movie.movie.overview)
    ));

    if let Some(director) = movie.director() {
        html.push_str(&format!(
            r#"<section class="director-section"><h3>Director</h3><p class="director">{}</p></section>"#,
            escape(&director.name)
        ));
    }

    let cast = movie.top_cast(TOP_CAST);
    if !cast.is_empty() {
        html.push_str(r#"<section class="cast-section"><h3>Top Cast</h3><div class="cast-grid">"#);
        for member in cast {
            html.push_str(&cast_member(member));
        }
        html.push_str("</div></section>");
    }

    if let Some(trailer) = movie.trailer() {
        let name = escape(&trailer.name);
        html.push_str(&format!(
            r#"<section class="trailer-section"><h3>Trailer</h3><div class="trailer"><iframe src="https://www.youtube.com/embed/{}" title="{}" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div><p class="trailer-name">"{}"</p></section>"#,
            escape(&trailer.key),
            name,
            name
        ));
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_not_found() -> String {
    page(
        "Not Found - Reelscope",
        r#"<h1 class="not-found">404: Page Not Found</h1>"#,
    )
}

fn movie_grid(movies: &[Movie], empty: &str) -> String {
    let mut html = String::from(r#"<div class="content-grid">"#);
    if movies.is_empty() {
        html.push_str(&format!(r#"<p class="no-results">{}</p>"#, empty));
    }
    for movie in movies {
        html.push_str(&movie_card(movie));
    }
    html.push_str("</div>");
    html
}

fn movie_card(movie: &Movie) -> String {
    let title = escape(&movie.title);
    let overview = if movie.overview.is_empty() {
        "No overview available.".to_string()
    } else {
        escape(&movie.overview)
    };
    format!(
        r#"<div class="content-card"><a href="/movie/{}"><img src="{}" alt="{}"><div class="card-info"><h3>{}</h3><p class="rating">⭐ {} <span class="year">({})</span></p></div><div class="card-overlay"><p>{}</p></div></a></div>"#,
        movie.id,
        image_url(movie.poster_path.as_deref(), "w300"),
        title,
        title,
        rating(movie.vote_average),
        release_year(&movie.release_date),
        overview
    )
}

fn cast_member(member: &CastMember) -> String {
    let name = escape(&member.name);
    format!(
        r#"<div class="cast-member"><img src="{}" alt="{}"><h4>{}</h4><p>{}</p></div>"#,
        image_url(member.profile_path.as_deref(), "w185"),
        name,
        name,
        escape(&member.character)
    )
}

fn loading(caption: &str) -> String {
    format!(
        r#"<div class="loading"><div class="spinner"></div><p>{}</p></div>"#,
        caption
    )
}

fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="error-message">Error: {}</div>"#,
        escape(message)
    )
}

/// Paths that are not plain TMDB image paths fall back to the placeholder,
/// so nothing from the API can leave the attribute or the CSS `url()`.
fn image_url(path: Option<&str>, size: &str) -> String {
    path.filter(|p| is_image_path(p))
        .map(|p| format!("{}/{}{}", IMAGE_BASE, size, escape(p)))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn is_image_path(path: &str) -> bool {
    path.starts_with('/')
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'))
}

/// TMDB reports unrated titles as 0.
pub fn rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}

/// Full dates go through chrono; partial ones ("1999", "1999-10") still
/// yield their leading year.
pub fn release_year(release_date: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(release_date, "%Y-%m-%d") {
        return date.year().to_string();
    }
    release_date
        .split('-')
        .next()
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse::<u16>().ok())
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn escape(text: &str) -> String {
    escape_html(text, Html).to_string()
}

fn page(title: &str, body: &str) -> String {
    let mut html = base_start(title);
    html.push_str(body);
    html.push_str(&base_end());
    html
}

fn base_start(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <nav class="navbar">
        <div class="nav-brand">
            <a href="/">Reelscope</a>
        </div>
        <form class="nav-search" action="/search" method="get">
            <input type="text" name="query" placeholder="Search movies...">
            <button type="submit">Search</button>
        </form>
    </nav>
    <main>"#,
        escape(title)
    )
}

fn base_end() -> String {
    String::from(r#"</main></body></html>"#)
}
