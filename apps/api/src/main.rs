mod config;
mod errors;
mod hierarchy;
mod hr_client;
mod models;
mod positions;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, PositionsBackend};
use crate::hr_client::HrApiClient;
use crate::positions::{InMemoryPositionStore, PositionStore, RemotePositionStore};
use crate::routes::build_router;
use crate::session::SessionState;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting People API v{}", env!("CARGO_PKG_VERSION"));

    let hr = HrApiClient::new(
        &config.hr_api_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("HR API client initialized ({})", hr.base_url());

    let positions: Arc<dyn PositionStore> = match config.positions_backend {
        PositionsBackend::Remote => Arc::new(RemotePositionStore::new(hr.clone())),
        PositionsBackend::Memory => Arc::new(InMemoryPositionStore::new()),
    };
    info!("Positions backend: {}", positions.backend());

    let session = SessionState::load(&config.session_file).await?;

    let state = AppState {
        config: config.clone(),
        hr,
        positions,
        session,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
