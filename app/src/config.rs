use config::{Config as ConfigBuilder, File};
use serde::Deserialize;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub bind_addr: String,
    pub port: u16,
}

/// Everything the TMDB client needs to build a request. Passed into
/// [`crate::tmdb::TmdbClient::new`] so tests can point it at a stub server.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
}

impl TmdbConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load("config", |key| std::env::var(key).ok())
    }

    /// Layers the optional config file under the environment. `env` is the
    /// variable lookup, injected so the precedence rules can be tested.
    pub fn load<F>(file: &str, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ConfigBuilder::builder()
            .add_source(File::with_name(file).required(false))
            .set_default("tmdb_base_url", DEFAULT_TMDB_BASE_URL)?
            .set_default("tmdb_language", DEFAULT_LANGUAGE)?
            .set_default("bind_addr", "127.0.0.1")?
            .set_default("port", 3000u16)?
            .build()?;

        let setting = |env_key: &str, file_key: &str| -> Option<String> {
            env(env_key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| config.get_string(file_key).ok())
        };

        let api_key = setting("TMDB_API_KEY", "tmdb_api_key")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("TMDB_API_KEY environment variable not set"))?;

        let mut tmdb = TmdbConfig::new(
            &setting("TMDB_BASE_URL", "tmdb_base_url")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string()),
            &api_key,
        );
        if let Some(language) = setting("TMDB_LANGUAGE", "tmdb_language") {
            tmdb.language = language;
        }

        Ok(Config {
            tmdb,
            bind_addr: setting("BIND_ADDR", "bind_addr").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| config.get_int("port").unwrap_or(3000) as u16),
        })
    }
}
