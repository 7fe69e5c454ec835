use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use reelscope::config::Config;
use reelscope::routes::build_router;
use reelscope::tmdb::TmdbClient;
use reelscope::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Reelscope...");

    let config = Config::new()?;
    info!("Configuration loaded");

    let tmdb_client = TmdbClient::new(config.tmdb.clone())?;
    info!("TMDB client initialized for {}", tmdb_client.config().base_url);

    let state = AppState {
        tmdb: Arc::new(tmdb_client),
    };

    let app = build_router(state, "app/static");

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port).parse()?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
