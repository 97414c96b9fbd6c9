use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayframe::config::{Cli, Config};
use dayframe::db;
use dayframe::routes;
use dayframe::state::AppState;
use dayframe::store::{DayImageStore, SqliteDayRepository};
use dayframe::unsplash::UnsplashClient;
use dayframe::viewer::{DayViewer, LocalClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;

    // Wire the components
    let source = UnsplashClient::from_config(&config.unsplash)?;
    tracing::info!("Photo source: {}", source.endpoint());
    let store = DayImageStore::new(
        Arc::new(source),
        Arc::new(SqliteDayRepository::new(pool)),
    );
    let viewer = DayViewer::new(Arc::new(LocalClock));
    let state = AppState::new(store, viewer);

    // Show today right away
    routes::day::reload(&state).await;

    let app = routes::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
