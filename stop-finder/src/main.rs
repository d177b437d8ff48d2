use stop_finder::config::AppConfig;
use stop_finder::directory::{DirectoryClient, MokaSessionStore, StopDirectoryCache};
use stop_finder::eta::{EtaClient, EtaGateway};
use stop_finder::finder::NearbyStopFinder;
use stop_finder::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stop_finder=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // The directory is loaded lazily by the first search, not at startup.
    let directory_client = DirectoryClient::new(config.directory_client())?;
    let store = MokaSessionStore::new(&config.session());
    let cache = StopDirectoryCache::new(directory_client, store);
    let finder = NearbyStopFinder::new(cache.into(), config.finder());

    let eta_client = EtaClient::new(config.eta_client())?;
    let eta = EtaGateway::new(eta_client);

    let state = AppState::new(finder, eta);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, api = %config.api_base, "stop finder listening");
    info!("  GET  /health");
    info!("  GET  /api/stops/nearby?lat=&lon=&radius=");
    info!("  GET  /api/stops/:id");
    info!("  POST /api/directory/invalidate");

    axum::serve(listener, app).await?;
    Ok(())
}
