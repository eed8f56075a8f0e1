use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_bot::bustracker::BustrackerClient;
use transit_bot::config::BotConfig;
use transit_bot::events::{EventSink, TracingSink};
use transit_bot::geocode::GeocodeClient;
use transit_bot::gtfs::{TransitData, TransitSnapshot};
use transit_bot::pipeline::{CannedFallback, Pipeline};
use transit_bot::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Serve with an empty stop table rather than not at all; the watcher
    // picks the feed up once it appears.
    let transit = match TransitData::load(config.gtfs.clone()).await {
        Ok(transit) => {
            let snapshot = transit.snapshot().await;
            info!(
                stops = snapshot.stops().len(),
                routes = snapshot.routes().len(),
                exceptions = snapshot.exceptions().len(),
                "loaded GTFS feed"
            );
            transit
        }
        Err(e) => {
            warn!(error = %e, dir = %config.gtfs.dir.display(), "no GTFS feed, starting empty");
            TransitData::new(TransitSnapshot::empty(), config.gtfs.clone())
        }
    };
    transit.watch();

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);

    let arrivals = match BustrackerClient::new(config.bustracker.clone(), Arc::clone(&sink)) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create bustracker client");
            return ExitCode::FAILURE;
        }
    };
    let geocoder = match GeocodeClient::new(config.geocode.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create geocoder client");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::new(
        arrivals,
        geocoder,
        CannedFallback::default(),
        config.search.clone(),
        sink,
    );
    let state = AppState::new(pipeline, transit, config.timezone);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %config.bind_addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.bind_addr, "transit bot listening");
    info!("  GET  /health");
    info!("  POST /sms");
    info!("  GET  /api/query?q=");
    info!("  GET  /api/stops/:number");
    info!("  GET  /api/nearby?lat=&lon=");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
