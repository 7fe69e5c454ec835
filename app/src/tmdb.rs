use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::TmdbConfig;

/// The one failure kind of the remote API. The variant records the cause;
/// callers treat every variant the same way.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("TMDB returned {status} for {path}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected response from {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn popular_movies(&self, page: u32) -> Result<Paginated<Movie>, NetworkError>;
    async fn search_movies(&self, query: &str, page: u32)
        -> Result<Paginated<Movie>, NetworkError>;
    async fn movie(&self, id: i64) -> Result<MovieDetail, NetworkError>;
    async fn movie_credits(&self, id: i64) -> Result<Credits, NetworkError>;
    async fn movie_videos(&self, id: i64) -> Result<Videos, NetworkError>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Single GET against `base_url + path`. The API key is always merged
    /// into the query; a caller-supplied `api_key` is dropped.
    pub async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Value, NetworkError> {
        let url = format!("{}/{}", self.config.base_url, path.trim_start_matches('/'));

        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(name, _)| *name != "api_key")
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        if !query.iter().any(|(name, _)| *name == "language") {
            query.push(("language", self.config.language.as_str()));
        }
        query.push(("api_key", self.config.api_key.as_str()));

        debug!("GET {}", url);

        let result = self.send(&url, path, &query).await;
        if let Err(ref e) = result {
            error!("Error fetching data from TMDB: {}", e);
        }
        result
    }

    async fn send(&self, url: &str, path: &str, query: &[(&str, &str)]) -> Result<Value, NetworkError> {
        let transport = |source| NetworkError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NetworkError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|source| NetworkError::Malformed {
            path: path.to_string(),
            source,
        })
    }

    /// [`fetch`](Self::fetch) plus a shape check against `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, NetworkError> {
        let value = self.fetch(path, params).await?;
        serde_json::from_value(value).map_err(|source| {
            let err = NetworkError::Malformed {
                path: path.to_string(),
                source,
            };
            error!("Error fetching data from TMDB: {}", err);
            err
        })
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn popular_movies(&self, page: u32) -> Result<Paginated<Movie>, NetworkError> {
        self.fetch_as("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Paginated<Movie>, NetworkError> {
        debug!("Searching TMDB for: {}", query);

        self.fetch_as(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn movie(&self, id: i64) -> Result<MovieDetail, NetworkError> {
        self.fetch_as(&format!("/movie/{}", id), &[]).await
    }

    async fn movie_credits(&self, id: i64) -> Result<Credits, NetworkError> {
        self.fetch_as(&format!("/movie/{}/credits", id), &[]).await
    }

    async fn movie_videos(&self, id: i64) -> Result<Videos, NetworkError> {
        self.fetch_as(&format!("/movie/{}/videos", id), &[]).await
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<i64>,
}

/// `/movie/{id}` plus the credits and videos fetched alongside it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<Videos>,
}

impl MovieDetail {
    pub fn director(&self) -> Option<&CrewMember> {
        self.credits
            .as_ref()?
            .crew
            .iter()
            .find(|member| member.job == "Director")
    }

    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        match self.credits {
            Some(ref credits) => &credits.cast[..credits.cast.len().min(limit)],
            None => &[],
        }
    }

    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .as_ref()?
            .results
            .iter()
            .find(|video| video.kind == "Trailer" && video.site == "YouTube")
    }

    pub fn genre_names(&self) -> String {
        let names: Vec<_> = self.genres.iter().map(|g| g.name.as_str()).collect();
        names.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Videos {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}
