#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use reelscope::tmdb::{
    CastMember, Credits, CrewMember, Genre, Movie, MovieDetail, NetworkError, Paginated,
    TmdbApi, Video, Videos,
};
use reqwest::StatusCode;
use tokio::sync::Notify;

/// Holds a call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeTmdb {
    pub popular: Vec<Movie>,
    pub searches: HashMap<String, Vec<Movie>>,
    pub details: HashMap<i64, (MovieDetail, Credits, Videos)>,
    /// Call kinds that fail: "popular", "search", "movie", "credits", "videos".
    pub failing: HashSet<&'static str>,
    /// Keyed like the recorded calls, e.g. "search:a" or "credits:550".
    pub gates: HashMap<String, Arc<Gate>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTmdb {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gate(&mut self, key: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.insert(key.to_string(), gate.clone());
        gate
    }

    async fn enter(&self, kind: &'static str, key: String) -> Result<(), NetworkError> {
        self.calls.lock().unwrap().push(key.clone());
        if let Some(gate) = self.gates.get(&key) {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        if self.failing.contains(kind) {
            return Err(failure(&key, StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(())
    }
}

pub fn failure(path: &str, status: StatusCode) -> NetworkError {
    NetworkError::Status {
        path: path.to_string(),
        status,
        body: "simulated".to_string(),
    }
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn popular_movies(&self, page: u32) -> Result<Paginated<Movie>, NetworkError> {
        self.enter("popular", "popular".to_string()).await?;
        Ok(paginate(page, self.popular.clone()))
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<Paginated<Movie>, NetworkError> {
        self.enter("search", format!("search:{}", query)).await?;
        Ok(paginate(page, self.searches.get(query).cloned().unwrap_or_default()))
    }

    async fn movie(&self, id: i64) -> Result<MovieDetail, NetworkError> {
        self.enter("movie", format!("movie:{}", id)).await?;
        self.details
            .get(&id)
            .map(|(detail, _, _)| detail.clone())
            .ok_or_else(|| failure(&format!("/movie/{}", id), StatusCode::NOT_FOUND))
    }

    async fn movie_credits(&self, id: i64) -> Result<Credits, NetworkError> {
        self.enter("credits", format!("credits:{}", id)).await?;
        self.details
            .get(&id)
            .map(|(_, credits, _)| credits.clone())
            .ok_or_else(|| failure(&format!("/movie/{}/credits", id), StatusCode::NOT_FOUND))
    }

    async fn movie_videos(&self, id: i64) -> Result<Videos, NetworkError> {
        self.enter("videos", format!("videos:{}", id)).await?;
        self.details
            .get(&id)
            .map(|(_, _, videos)| videos.clone())
            .ok_or_else(|| failure(&format!("/movie/{}/videos", id), StatusCode::NOT_FOUND))
    }
}

fn paginate(page: u32, results: Vec<Movie>) -> Paginated<Movie> {
    Paginated {
        page,
        total_pages: 1,
        total_results: results.len() as u32,
        results,
    }
}

pub fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster{}.jpg", id)),
        backdrop_path: None,
        release_date: "1999-10-15".to_string(),
        vote_average: Some(8.4),
        overview: format!("Overview of {}", title),
        genre_ids: vec![18],
    }
}

pub fn fight_club() -> (MovieDetail, Credits, Videos) {
    let detail = MovieDetail {
        movie: movie(550, "Fight Club"),
        runtime: Some(139),
        tagline: Some("Mischief. Mayhem. Soap.".to_string()),
        genres: vec![Genre {
            id: 18,
            name: "Drama".to_string(),
        }],
        credits: None,
        videos: None,
    };
    let credits = Credits {
        cast: vec![CastMember {
            id: 819,
            name: "Edward Norton".to_string(),
            character: "The Narrator".to_string(),
            profile_path: None,
        }],
        crew: vec![CrewMember {
            id: 7467,
            name: "David Fincher".to_string(),
            job: "Director".to_string(),
            profile_path: None,
        }],
    };
    let videos = Videos {
        results: vec![Video {
            id: "v1".to_string(),
            key: "SUXWAEX2jlg".to_string(),
            name: "Fight Club Trailer".to_string(),
            site: "YouTube".to_string(),
            kind: "Trailer".to_string(),
        }],
    };
    (detail, credits, videos)
}

/// Fake with popular movies, a two-result "batman" search and movie 550.
pub fn seeded() -> FakeTmdb {
    let mut fake = FakeTmdb {
        popular: vec![movie(1, "Dune"), movie(2, "Alien"), movie(3, "Heat")],
        ..FakeTmdb::default()
    };
    fake.searches.insert(
        "batman".to_string(),
        vec![movie(268, "Batman"), movie(272, "Batman Begins")],
    );
    fake.details.insert(550, fight_club());
    fake
}
