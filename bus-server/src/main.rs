use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_server::cache::CachedGeocoder;
use bus_server::config::ServerConfig;
use bus_server::dataset::Dataset;
use bus_server::geocoding::Geocoder;
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Fail fast if the network can't be loaded
    let dataset = Dataset::load(&config.database_path)?;

    let geocoder = Geocoder::from_config(config.serpapi.clone(), config.nominatim.clone())?;
    info!(providers = ?geocoder.provider_names(), "Geocoding providers");
    let geocoder = CachedGeocoder::new(geocoder, &config.geocode_cache);

    let state = AppState::new(
        dataset,
        geocoder,
        config.planner.clone(),
        config.default_city.as_str(),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Mo Bus route planner listening");

    axum::serve(listener, app).await?;
    Ok(())
}
